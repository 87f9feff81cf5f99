// ==========================================
// 价值流图分析系统 - 精益指标引擎
// ==========================================
// 依据: 精益生产 VSM 标准公式
// 职责: OEE、一次通过率、增值比率、库存周转、产能利用率等聚合指标
// 红线: 每个指标 = 数值 + 由配置阈值带判定的状态, 引擎内无魔法数字
// 说明: FTT 采用平均合格率的幂次口径 (简化口径);
//       精确链式合格率 ∏ yield_i 以 chained_yield_pct 单独给出, 两者不混用
// ==========================================
// 输入: ValueStreamState (按值快照)
// 输出: LeanMetrics (空价值流 → 全零结果, 不是错误)
// ==========================================

use crate::config::AnalysisConfig;
use crate::domain::types::MetricStatus;
use crate::domain::ValueStreamState;
use crate::engine::bottleneck::BottleneckAnalyzer;
use crate::engine::lead_time::LeadTimeEngine;
use crate::error::AnalysisResult;
use serde::{Deserialize, Serialize};
use tracing::instrument;

// ==========================================
// 结果对象
// ==========================================

/// 指标值 = 数值 + 状态带
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub value: f64,
    pub status: MetricStatus,
}

/// 精益指标全集
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeanMetrics {
    /// OEE (%) = 工序 (uptime × performance × yield) 的均值 × 100
    pub oee: MetricValue,
    /// 一次通过率 FTT (%) = (平均合格率)^工序数 × 100 (简化口径)
    pub first_time_through: MetricValue,
    /// 链式合格率 (%) = ∏ yield_i × 100 (精确口径, 独立指标)
    pub chained_yield_pct: f64,
    /// 流程周期效率 PCE (%)
    pub process_cycle_efficiency: MetricValue,
    /// 增值比率 (%) = 增值时间 / 总交付周期 × 100
    pub value_added_ratio: MetricValue,
    /// 库存周转次数 (次/年) = 日需求 × 365 / 总库存件数 (库存为 0 时取 0)
    pub inventory_turns: f64,
    /// 库存天数 (天) = 总库存件数 / 日需求 (库存为 0 时取 0)
    pub days_of_inventory: MetricValue,
    /// 产能利用率 (%) = 瓶颈利用率 × 100 (无瓶颈时取 0)
    pub capacity_utilization: MetricValue,
    /// 产出率 (件/小时) = 60 / 瓶颈周期时间 (空价值流取 0)
    pub throughput_rate_per_hour: f64,
    /// 总交付周期 (分钟)
    pub total_lead_time: f64,
}

// ==========================================
// LeanMetricsEngine - 精益指标引擎
// ==========================================
// 红线: 无状态引擎, 所有方法都是纯函数
pub struct LeanMetricsEngine {
    config: AnalysisConfig,
}

impl LeanMetricsEngine {
    /// 创建新的精益指标引擎
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self::new(AnalysisConfig::default())
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算精益指标全集
    #[instrument(skip(self, state), fields(process_count = state.processes.len()))]
    pub fn compute(&self, state: &ValueStreamState) -> AnalysisResult<LeanMetrics> {
        // 需求输入校验 (空工序列表不是错误)
        state.takt_time()?;

        let bands = &self.config.thresholds;
        let lead_time = LeadTimeEngine::new(self.config.clone()).compute(state)?;
        let bottleneck = BottleneckAnalyzer::new(self.config.clone()).identify(state)?;

        let process_count = state.processes.len();

        // OEE: uptime × performance × yield 的均值
        let oee_pct = if process_count > 0 {
            let sum: f64 = state
                .processes
                .iter()
                .map(|p| p.uptime * self.config.performance_factor * p.yield_rate)
                .sum();
            sum / process_count as f64 * 100.0
        } else {
            0.0
        };

        // FTT (简化口径): 平均合格率的工序数次幂
        let first_time_through_pct = if process_count > 0 {
            let mean_yield: f64 = state.processes.iter().map(|p| p.yield_rate).sum::<f64>()
                / process_count as f64;
            mean_yield.powi(process_count as i32) * 100.0
        } else {
            0.0
        };

        // 链式合格率 (精确口径): 各工序合格率连乘
        let chained_yield_pct = if process_count > 0 {
            state
                .processes
                .iter()
                .map(|p| p.yield_rate)
                .product::<f64>()
                * 100.0
        } else {
            0.0
        };

        // 库存口径 (为 0 时两个指标都取 0, 避免除零)
        let total_units = state.total_inventory_units();
        let (inventory_turns, days_of_inventory) = if total_units > 0.0 {
            (
                state.daily_demand * 365.0 / total_units,
                total_units / state.daily_demand,
            )
        } else {
            (0.0, 0.0)
        };

        // 产能利用率与产出率 (瓶颈限速)
        let capacity_utilization_pct = bottleneck
            .as_ref()
            .map(|b| b.utilization * 100.0)
            .unwrap_or(0.0);
        let throughput_rate_per_hour = if process_count > 0 {
            let max_cycle = state
                .processes
                .iter()
                .map(|p| p.cycle_time)
                .fold(f64::MIN, f64::max);
            60.0 / max_cycle
        } else {
            0.0
        };

        Ok(LeanMetrics {
            oee: Self::metric(oee_pct, bands.oee.classify(oee_pct)),
            first_time_through: Self::metric(
                first_time_through_pct,
                bands.first_time_through.classify(first_time_through_pct),
            ),
            chained_yield_pct,
            process_cycle_efficiency: Self::metric(
                lead_time.process_cycle_efficiency,
                bands.pce.classify(lead_time.process_cycle_efficiency),
            ),
            value_added_ratio: Self::metric(
                lead_time.process_cycle_efficiency,
                bands
                    .value_added_ratio
                    .classify(lead_time.process_cycle_efficiency),
            ),
            inventory_turns,
            days_of_inventory: Self::metric(
                days_of_inventory,
                bands.days_of_inventory.classify(days_of_inventory),
            ),
            capacity_utilization: Self::metric(
                capacity_utilization_pct,
                bands
                    .capacity_utilization
                    .classify(capacity_utilization_pct),
            ),
            throughput_rate_per_hour,
            total_lead_time: lead_time.total_lead_time,
        })
    }

    fn metric(value: f64, status: MetricStatus) -> MetricValue {
        MetricValue { value, status }
    }
}
