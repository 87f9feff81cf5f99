// ==========================================
// 价值流图分析系统 - 引擎层
// ==========================================
// 职责: 实现精益指标计算与决策规则引擎
// 红线: 引擎无状态、无 I/O, 所有规则必须输出 reason/描述;
//       统一公式口径, 简化口径只通过配置清零可选项表达
// ==========================================
// 数据流: 价值流状态 → 节拍/交付周期 → 精益指标
//         → 瓶颈识别 → 改善机会 → 未来状态投射
// ==========================================

pub mod bottleneck;
pub mod future_state;
pub mod lead_time;
pub mod metrics;
pub mod opportunity;

// 重导出核心引擎
pub use bottleneck::{
    Bottleneck, BottleneckAnalyzer, ImprovementLever, NextBottleneck, SimulationResult,
};
pub use future_state::{
    FutureStateProjector, FutureStateResult, Improvement, MetricGap, RoadmapPhase,
};
pub use lead_time::{
    LeadTimeEngine, LeadTimeResult, LittlesLawResult, ProcessLeadTime, TaktResult, TimeBreakdown,
};
pub use metrics::{LeanMetrics, LeanMetricsEngine, MetricValue};
pub use opportunity::{ImprovementOpportunity, OpportunityEngine};
