// ==========================================
// 价值流图分析系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供 UI/报表/存储等外部协作方调用
// 红线: 入参与出参都是可序列化的纯数据记录,
//       协作方不依赖引擎内部结构
// ==========================================

pub mod analysis_api;

// 重导出核心类型
pub use analysis_api::{AnalysisApi, AnalysisReport};
