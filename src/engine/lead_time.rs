// ==========================================
// 价值流图分析系统 - 节拍与交付周期引擎
// ==========================================
// 依据: 精益生产 VSM 标准公式
// 职责: 节拍时间、单工序交付周期分解、价值流总交付周期、Little 定律校核
// 红线: 只有一条公式路径; 简化口径 (不计搬运/排队) 通过配置清零表达,
//       不允许第二套公式
// ==========================================
// 输入: ValueStreamState (按值快照)
// 输出: TaktResult / LeadTimeResult / LittlesLawResult
// ==========================================

use crate::config::AnalysisConfig;
use crate::domain::{Process, ValueStreamState};
use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

// ==========================================
// 结果对象
// ==========================================

/// 节拍时间结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaktResult {
    /// 节拍时间 (分钟/件)
    pub takt_time: f64,
    /// 日需求量 (件/天)
    pub daily_demand: f64,
    /// 可用生产时间 (分钟/期间)
    pub available_time: f64,
}

/// 单工序交付周期分解
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessLeadTime {
    pub process_id: String,
    pub process_name: String,
    /// 加工时间 = cycle_time
    pub processing_time: f64,
    /// 等待时间 = inventory_before × takt_time
    pub waiting_time: f64,
    /// 单件换型时间 = setup_time / batch_size
    pub setup_time_per_unit: f64,
    /// 搬运时间 (配置常量)
    pub move_time: f64,
    /// 排队时间 = max(0, inventory_before - 1) × takt_time
    pub queue_time: f64,
    /// 合计
    pub total: f64,
}

/// 时间构成分解 (供时间分析条渲染)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBreakdown {
    pub value_added_time: f64,
    pub setup_time: f64,
    pub waiting_time: f64,
    pub value_added_pct: f64,
    pub setup_pct: f64,
    pub waiting_pct: f64,
}

/// 价值流总交付周期结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadTimeResult {
    /// 总交付周期 (分钟)
    pub total_lead_time: f64,
    /// 增值时间 (分钟, 仅 value_added 工序的 cycle_time)
    pub value_added_time: f64,
    /// 非增值时间 (分钟)
    pub non_value_added_time: f64,
    /// 流程周期效率 PCE (%) = 增值时间 / 总交付周期 × 100
    pub process_cycle_efficiency: f64,
    /// 库存集合贡献的等待时间 (分钟, quantity × takt_time 之和)
    pub inventory_wait_time: f64,
    /// 逐工序分解
    pub per_process: Vec<ProcessLeadTime>,
    /// 时间构成分解
    pub time_breakdown: TimeBreakdown,
}

impl LeadTimeResult {
    /// 空价值流的零值结果 (空不是错误)
    pub fn empty() -> Self {
        Self {
            total_lead_time: 0.0,
            value_added_time: 0.0,
            non_value_added_time: 0.0,
            process_cycle_efficiency: 0.0,
            inventory_wait_time: 0.0,
            per_process: Vec::new(),
            time_breakdown: TimeBreakdown {
                value_added_time: 0.0,
                setup_time: 0.0,
                waiting_time: 0.0,
                value_added_pct: 0.0,
                setup_pct: 0.0,
                waiting_pct: 0.0,
            },
        }
    }
}

/// Little 定律校核结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LittlesLawResult {
    /// 理论在制 = 产出率 × (交付周期 / 60)
    pub theoretical_wip: f64,
    /// 实际在制 = 工序前在制 + 库存集合数量
    pub actual_wip: f64,
    /// 差额 = 实际 - 理论
    pub difference: f64,
    /// 在制效率 (%) = 理论 / 实际 × 100 (实际为 0 时取 0)
    pub efficiency_pct: f64,
}

// ==========================================
// LeadTimeEngine - 节拍与交付周期引擎
// ==========================================
// 红线: 无状态引擎, 所有方法都是纯函数
pub struct LeadTimeEngine {
    config: AnalysisConfig,
}

impl LeadTimeEngine {
    /// 创建新的交付周期引擎
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self::new(AnalysisConfig::default())
    }

    // ==========================================
    // 节拍时间
    // ==========================================

    /// 节拍时间 = 可用时间 / 日需求量
    ///
    /// # 错误
    /// - `InvalidDemand`: daily_demand <= 0 或 available_time <= 0
    pub fn takt_time(daily_demand: f64, available_time: f64) -> AnalysisResult<TaktResult> {
        if daily_demand <= 0.0 || available_time <= 0.0 {
            return Err(AnalysisError::InvalidDemand {
                daily_demand,
                available_time,
            });
        }
        Ok(TaktResult {
            takt_time: available_time / daily_demand,
            daily_demand,
            available_time,
        })
    }

    // ==========================================
    // 单工序交付周期分解
    // ==========================================

    /// 单工序交付周期分解
    ///
    /// 公式:
    /// - processing_time = cycle_time
    /// - waiting_time = inventory_before × takt_time
    /// - setup_time_per_unit = setup_time / batch_size
    /// - move_time = 配置常量 (默认 5 分钟)
    /// - queue_time = max(0, inventory_before - 1) × takt_time (可配置关闭)
    pub fn process_lead_time(&self, process: &Process, takt_time: f64) -> ProcessLeadTime {
        let processing_time = process.cycle_time;
        let waiting_time = process.inventory_before * takt_time;
        let setup_time_per_unit = process.setup_time_per_unit();
        let move_time = self.config.move_time_min;
        let queue_time = if self.config.include_queue_time {
            (process.inventory_before - 1.0).max(0.0) * takt_time
        } else {
            0.0
        };

        ProcessLeadTime {
            process_id: process.id.clone(),
            process_name: process.name.clone(),
            processing_time,
            waiting_time,
            setup_time_per_unit,
            move_time,
            queue_time,
            total: processing_time + waiting_time + setup_time_per_unit + move_time + queue_time,
        }
    }

    // ==========================================
    // 价值流总交付周期
    // ==========================================

    /// 价值流总交付周期
    ///
    /// 总交付周期 = Σ 工序分解合计 + Σ 库存 quantity × takt_time;
    /// 增值时间只累计 value_added 工序的 cycle_time;
    /// PCE = 增值时间 / 总交付周期 × 100 (总交付周期为 0 时取 0)
    #[instrument(skip(self, state), fields(process_count = state.processes.len()))]
    pub fn compute(&self, state: &ValueStreamState) -> AnalysisResult<LeadTimeResult> {
        let takt = state.takt_time()?;

        if state.is_empty() {
            return Ok(LeadTimeResult::empty());
        }

        let per_process: Vec<ProcessLeadTime> = state
            .processes
            .iter()
            .map(|p| self.process_lead_time(p, takt))
            .collect();

        let process_total: f64 = per_process.iter().map(|p| p.total).sum();
        let inventory_wait_time: f64 =
            state.inventories.iter().map(|i| i.quantity * takt).sum();
        let total_lead_time = process_total + inventory_wait_time;

        let value_added_time: f64 = state
            .processes
            .iter()
            .filter(|p| p.value_added)
            .map(|p| p.cycle_time)
            .sum();
        let non_value_added_time = total_lead_time - value_added_time;

        let process_cycle_efficiency = if total_lead_time > 0.0 {
            value_added_time / total_lead_time * 100.0
        } else {
            0.0
        };

        let time_breakdown =
            Self::time_breakdown(&per_process, value_added_time, total_lead_time);

        debug!(
            total_lead_time,
            value_added_time, process_cycle_efficiency, "交付周期计算完成"
        );

        Ok(LeadTimeResult {
            total_lead_time,
            value_added_time,
            non_value_added_time,
            process_cycle_efficiency,
            inventory_wait_time,
            per_process,
            time_breakdown,
        })
    }

    /// 时间构成分解: 增值 / 换型 / 等待 (等待 = 总计 - 增值 - 换型)
    fn time_breakdown(
        per_process: &[ProcessLeadTime],
        value_added_time: f64,
        total_lead_time: f64,
    ) -> TimeBreakdown {
        let setup_time: f64 = per_process.iter().map(|p| p.setup_time_per_unit).sum();
        let waiting_time = (total_lead_time - value_added_time - setup_time).max(0.0);

        let pct = |part: f64| {
            if total_lead_time > 0.0 {
                part / total_lead_time * 100.0
            } else {
                0.0
            }
        };

        TimeBreakdown {
            value_added_time,
            setup_time,
            waiting_time,
            value_added_pct: pct(value_added_time),
            setup_pct: pct(setup_time),
            waiting_pct: pct(waiting_time),
        }
    }

    // ==========================================
    // Little 定律校核
    // ==========================================

    /// Little 定律校核
    ///
    /// 理论在制 = 产出率 (件/小时, 瓶颈限速 = 60 / 最大 cycle_time)
    ///            × (总交付周期 / 60)
    /// 实际在制 = 所有工序前在制 + 库存集合数量
    pub fn littles_law_check(&self, state: &ValueStreamState) -> AnalysisResult<LittlesLawResult> {
        let lead_time = self.compute(state)?;

        if state.is_empty() {
            return Ok(LittlesLawResult {
                theoretical_wip: 0.0,
                actual_wip: state.total_inventory_units(),
                difference: state.total_inventory_units(),
                efficiency_pct: 0.0,
            });
        }

        // 瓶颈限速产出率 (件/小时)
        let max_cycle_time = state
            .processes
            .iter()
            .map(|p| p.cycle_time)
            .fold(f64::MIN, f64::max);
        let throughput_per_hour = 60.0 / max_cycle_time;

        let theoretical_wip = throughput_per_hour * (lead_time.total_lead_time / 60.0);
        let actual_wip = state.total_inventory_units();
        let difference = actual_wip - theoretical_wip;
        let efficiency_pct = if actual_wip > 0.0 {
            theoretical_wip / actual_wip * 100.0
        } else {
            0.0
        };

        Ok(LittlesLawResult {
            theoretical_wip,
            actual_wip,
            difference,
            efficiency_pct,
        })
    }
}
