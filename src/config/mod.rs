// ==========================================
// 价值流图分析系统 - 配置层
// ==========================================
// 职责: 集中管理阈值带、固定参数与改善目标
// 红线: 引擎层不出现硬编码魔法数字, 可调参数全部在此
// ==========================================

pub mod analysis_config;

// 重导出核心类型
pub use analysis_config::{
    AnalysisConfig, BottleneckConfig, FutureStateTargets, MetricBands, MetricThresholds,
    OpportunityConfig, RoiTable,
};
