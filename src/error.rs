// ==========================================
// 价值流图分析系统 - 错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 校验错误在构造/入参处同步抛出;
//       空价值流不是错误, 下游计算必须返回零值结果
// ==========================================

use thiserror::Error;

/// 分析引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    // ===== 需求输入错误 =====
    #[error("无效的需求参数: daily_demand={daily_demand}, available_time={available_time} (两者必须 > 0)")]
    InvalidDemand {
        daily_demand: f64,
        available_time: f64,
    },

    // ===== 工序数据错误 =====
    #[error("无效的工序数据 (process={process_id}, field={field}): {message}")]
    InvalidProcess {
        process_id: String,
        field: String,
        message: String,
    },

    // ===== 库存数据错误 =====
    #[error("无效的库存数据 (inventory={inventory_id}, field={field}): {message}")]
    InvalidInventory {
        inventory_id: String,
        field: String,
        message: String,
    },
}

/// 分析引擎统一结果类型
pub type AnalysisResult<T> = Result<T, AnalysisError>;
