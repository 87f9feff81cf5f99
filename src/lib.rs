// ==========================================
// 价值流图分析系统 - 核心库
// ==========================================
// 系统定位: 决策支持引擎 (纯计算, 不含 UI/持久化)
// 红线: 引擎层不做 I/O, 所有计算都是纯函数
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 阈值与参数
pub mod config;

// 引擎层 - 业务规则
pub mod engine;

// API 层 - 业务接口
pub mod api;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    BottleneckSeverity, EffortClass, FlowType, ImpactClass, ImprovementType, InventoryType,
    MetricStatus, OpportunityCategory, Priority, ProcessType,
};

// 领域实体
pub use domain::{Inventory, Process, ValueStreamState};

// 配置
pub use config::{AnalysisConfig, FutureStateTargets};

// 引擎
pub use engine::{
    Bottleneck, BottleneckAnalyzer, FutureStateProjector, FutureStateResult,
    ImprovementOpportunity, LeadTimeEngine, LeadTimeResult, LeanMetrics, LeanMetricsEngine,
    OpportunityEngine,
};

// API
pub use api::{AnalysisApi, AnalysisReport};

// 错误
pub use error::AnalysisError;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "价值流图分析系统";

// ==========================================
// 预编译检查
// ==========================================
