// ==========================================
// 价值流图分析系统 - 领域层
// ==========================================
// 职责: 定义价值流实体与枚举类型
// 红线: 实体只承载数据与校验, 指标计算全部在引擎层
// ==========================================

pub mod inventory;
pub mod process;
pub mod state;
pub mod types;

// 重导出核心类型
pub use inventory::Inventory;
pub use process::Process;
pub use state::ValueStreamState;
