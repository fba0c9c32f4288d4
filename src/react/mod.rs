//! 规划层：Planner（指令与单轮模型调用）、有界工具调用主循环、进度事件

pub mod events;
pub mod loop_;
pub mod planner;

pub use events::RunEvent;
pub use loop_::{run_planning_loop, PlanningSession, RunReport};
pub use planner::{initial_instruction, system_prompt, Planner};
