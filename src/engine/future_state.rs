// ==========================================
// 价值流图分析系统 - 未来状态投射引擎
// ==========================================
// 职责: 在价值流深克隆上按固定顺序施加改善变换,
//       重算全部指标并产出前后差距分析与实施路线图
// 红线: 只操作本次投射私有的深克隆, 与真实状态零别名;
//       步骤顺序固定 (后续步骤读取前序步骤改写的字段)
// ==========================================
// 步骤顺序:
//   1. 瓶颈改善   2. 库存削减   3. 浪费消除 (成本/收益评估)
//   4. 流动改善   5. 质量提升
// ==========================================

use crate::config::{AnalysisConfig, FutureStateTargets};
use crate::domain::types::{FlowType, ImprovementType};
use crate::domain::ValueStreamState;
use crate::engine::bottleneck::BottleneckAnalyzer;
use crate::engine::metrics::{LeanMetrics, LeanMetricsEngine};
use crate::error::AnalysisResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

// ==========================================
// 结果对象
// ==========================================

/// 单条改善记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub id: String,
    pub improvement_type: ImprovementType,
    pub description: String,
    /// 影响说明
    pub impact: String,
    /// 实施周期估算文本 ("x-y weeks" / "x-y months" / "6-12 months")
    pub implementation_estimate: String,
}

/// 单指标前后差距
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricGap {
    pub metric: String,
    pub before: f64,
    pub after: f64,
    /// 变化率 (%) = (after - before) / before × 100 (before 为 0 时取 0)
    pub change_pct: f64,
}

/// 实施路线图阶段 (按实施周期文本分桶)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub phase: u32,
    pub horizon: String,
    pub improvement_ids: Vec<String>,
}

/// 未来状态投射结果
///
/// 归本次投射独占, 报告后即弃, 不回写真实状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureStateResult {
    /// 变换后的价值流 (深克隆)
    pub future_state: ValueStreamState,
    /// 改善记录日志 (按步骤顺序)
    pub improvements: Vec<Improvement>,
    /// 当前指标
    pub current_metrics: LeanMetrics,
    /// 未来指标
    pub future_metrics: LeanMetrics,
    /// 差距分析
    pub gap_analysis: Vec<MetricGap>,
    /// 三阶段实施路线图
    pub roadmap: Vec<RoadmapPhase>,
}

// ==========================================
// FutureStateProjector - 未来状态投射引擎
// ==========================================
pub struct FutureStateProjector {
    config: AnalysisConfig,
}

impl FutureStateProjector {
    /// 创建新的未来状态投射引擎
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

    /// 投射未来状态
    ///
    /// 五个固定步骤依次作用在同一个深克隆上, 每步追加改善记录;
    /// 最后重算指标并与当前状态对比
    #[instrument(skip(self, state, targets), fields(process_count = state.processes.len()))]
    pub fn project(
        &self,
        state: &ValueStreamState,
        targets: &FutureStateTargets,
    ) -> AnalysisResult<FutureStateResult> {
        state.takt_time()?;

        let metrics_engine = LeanMetricsEngine::new(self.config.clone());
        let current_metrics = metrics_engine.compute(state)?;

        // 深克隆: 投射私有, 与真实状态零别名
        let mut future = state.clone();
        let mut improvements = Vec::new();

        self.apply_bottleneck_improvement(state, &mut future, targets, &mut improvements)?;
        self.apply_inventory_reduction(&mut future, targets, &mut improvements);
        self.apply_waste_elimination(&mut future, targets, &mut improvements);
        self.apply_flow_improvement(&mut future, targets, &mut improvements);
        self.apply_quality_enhancement(&mut future, targets, &mut improvements);

        let future_metrics = metrics_engine.compute(&future)?;
        let gap_analysis = Self::gap_analysis(&current_metrics, &future_metrics);
        let roadmap = Self::build_roadmap(&improvements);

        debug!(
            improvement_count = improvements.len(),
            "未来状态投射完成"
        );

        Ok(FutureStateResult {
            future_state: future,
            improvements,
            current_metrics,
            future_metrics,
            gap_analysis,
            roadmap,
        })
    }

    // ==========================================
    // 步骤1: 瓶颈改善
    // ==========================================
    // cycle_time × 0.85, uptime = min(0.98, uptime + 0.05),
    // setup_time × 0.5 (仅 > 0 时)
    fn apply_bottleneck_improvement(
        &self,
        original: &ValueStreamState,
        future: &mut ValueStreamState,
        targets: &FutureStateTargets,
        log: &mut Vec<Improvement>,
    ) -> AnalysisResult<()> {
        let bottleneck = match BottleneckAnalyzer::new(self.config.clone()).identify(original)? {
            Some(b) => b,
            None => return Ok(()),
        };

        let process = &mut future.processes[bottleneck.position];
        let old_cycle = process.cycle_time;
        process.cycle_time *= targets.bottleneck_cycle_time_factor;
        process.uptime =
            (process.uptime + targets.bottleneck_uptime_gain).min(targets.bottleneck_uptime_cap);
        if process.setup_time > 0.0 {
            process.setup_time *= targets.setup_reduction_factor;
        }

        log.push(Self::improvement(
            ImprovementType::BottleneckImprovement,
            format!(
                "Improve bottleneck \"{}\": cycle time {:.2} -> {:.2} min, raise uptime, halve setup",
                process.name, old_cycle, process.cycle_time
            ),
            format!(
                "Cycle time reduced by {:.0}%",
                (1.0 - targets.bottleneck_cycle_time_factor) * 100.0
            ),
            "4-6 weeks",
        ));
        Ok(())
    }

    // ==========================================
    // 步骤2: 库存削减
    // ==========================================
    // quantity × (1 - target), 向下取整, 最低 1 件 (仅对原有库存 > 0 者);
    // max_level = 新数量 × 1.5, reorder_point = ceil(新数量 × 0.3);
    // 同比例作用于各工序 inventory_before
    fn apply_inventory_reduction(
        &self,
        future: &mut ValueStreamState,
        targets: &FutureStateTargets,
        log: &mut Vec<Improvement>,
    ) {
        let factor = 1.0 - targets.inventory_reduction_target;
        let mut touched = 0usize;

        for inventory in &mut future.inventories {
            if inventory.quantity > 0.0 {
                let new_qty = (inventory.quantity * factor).floor().max(1.0);
                inventory.quantity = new_qty;
                inventory.max_level = new_qty * 1.5;
                inventory.reorder_point = (new_qty * 0.3).ceil();
                touched += 1;
            }
        }
        for process in &mut future.processes {
            if process.inventory_before > 0.0 {
                process.inventory_before = (process.inventory_before * factor).floor().max(1.0);
                touched += 1;
            }
        }

        if touched > 0 {
            log.push(Self::improvement(
                ImprovementType::InventoryReduction,
                format!(
                    "Reduce {} inventory buffer(s) by {:.0}% with resized max levels and reorder points",
                    touched,
                    targets.inventory_reduction_target * 100.0
                ),
                format!(
                    "Inventory carrying reduced by ~{:.0}%",
                    targets.inventory_reduction_target * 100.0
                ),
                "2-3 months",
            ));
        }
    }

    // ==========================================
    // 步骤3: 浪费消除 (成本/收益评估)
    // ==========================================
    // savings = cost × 0.8 与 cost 比较; 该固定比例下 savings 永远
    // 不超过 cost, 评估结果恒为不消除 — 与源口径保持一致,
    // 阈值修订留待产品决策, 这里只记录评估本身
    fn apply_waste_elimination(
        &self,
        future: &mut ValueStreamState,
        targets: &FutureStateTargets,
        log: &mut Vec<Improvement>,
    ) {
        let candidates: Vec<usize> = future
            .processes
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.value_added)
            .map(|(i, _)| i)
            .collect();

        if candidates.is_empty() {
            return;
        }

        let mut eliminated = Vec::new();
        for &index in candidates.iter().rev() {
            let process = &future.processes[index];
            // 相对成本口径: 周期时间 × 操作工人数
            let cost = process.cycle_time * process.operators as f64;
            let savings = cost * targets.waste_savings_ratio;
            if savings > cost {
                eliminated.push(future.processes.remove(index).name);
            }
        }

        let impact = if eliminated.is_empty() {
            "none (no candidate met the cost/benefit threshold)".to_string()
        } else {
            format!("{} process(es) eliminated", eliminated.len())
        };

        log.push(Self::improvement(
            ImprovementType::WasteElimination,
            format!(
                "Evaluated {} non-value-added process(es) for elimination",
                candidates.len()
            ),
            impact,
            "2-4 weeks",
        ));
    }

    // ==========================================
    // 步骤4: 流动改善
    // ==========================================
    // push 且 inventory_before > 5 转 pull:
    // kanban_size = ceil(inventory_before × 0.5), inventory_before 重置为看板数量
    fn apply_flow_improvement(
        &self,
        future: &mut ValueStreamState,
        targets: &FutureStateTargets,
        log: &mut Vec<Improvement>,
    ) {
        let mut converted = Vec::new();

        for process in &mut future.processes {
            if process.flow_type == FlowType::Push
                && process.inventory_before > targets.flow_push_inventory_threshold
            {
                process.flow_type = FlowType::Pull;
                process.kanban_size = (process.inventory_before * targets.kanban_ratio).ceil();
                process.inventory_before = process.kanban_size;
                converted.push(process.name.clone());
            }
        }

        if !converted.is_empty() {
            log.push(Self::improvement(
                ImprovementType::FlowImprovement,
                format!(
                    "Convert {} process(es) from push to pull with kanban sizing: {}",
                    converted.len(),
                    converted.join(", ")
                ),
                "Queues capped at kanban size".to_string(),
                "3-6 months",
            ));
        }
    }

    // ==========================================
    // 步骤5: 质量提升
    // ==========================================
    // 每个工序 yield = min(0.999, yield + target)
    fn apply_quality_enhancement(
        &self,
        future: &mut ValueStreamState,
        targets: &FutureStateTargets,
        log: &mut Vec<Improvement>,
    ) {
        if future.processes.is_empty() {
            return;
        }

        for process in &mut future.processes {
            process.yield_rate =
                (process.yield_rate + targets.quality_improvement_target).min(targets.yield_cap);
        }

        log.push(Self::improvement(
            ImprovementType::QualityEnhancement,
            format!(
                "Raise yield by {:.1} pt across all processes (capped at {:.1}%)",
                targets.quality_improvement_target * 100.0,
                targets.yield_cap * 100.0
            ),
            "First-time-through improved".to_string(),
            "6-12 months",
        ));
    }

    // ==========================================
    // 差距分析与路线图
    // ==========================================

    fn gap_analysis(before: &LeanMetrics, after: &LeanMetrics) -> Vec<MetricGap> {
        let gap = |metric: &str, b: f64, a: f64| MetricGap {
            metric: metric.to_string(),
            before: b,
            after: a,
            change_pct: if b != 0.0 { (a - b) / b * 100.0 } else { 0.0 },
        };

        vec![
            gap(
                "total_lead_time",
                before.total_lead_time,
                after.total_lead_time,
            ),
            gap(
                "process_cycle_efficiency",
                before.process_cycle_efficiency.value,
                after.process_cycle_efficiency.value,
            ),
            gap("oee", before.oee.value, after.oee.value),
            gap(
                "first_time_through",
                before.first_time_through.value,
                after.first_time_through.value,
            ),
            gap(
                "days_of_inventory",
                before.days_of_inventory.value,
                after.days_of_inventory.value,
            ),
            gap(
                "capacity_utilization",
                before.capacity_utilization.value,
                after.capacity_utilization.value,
            ),
            gap(
                "throughput_rate_per_hour",
                before.throughput_rate_per_hour,
                after.throughput_rate_per_hour,
            ),
        ]
    }

    /// 三阶段路线图: 按实施周期文本分桶
    /// ("6-12" → 阶段3, 含 "month" → 阶段2, 其余 ("weeks") → 阶段1)
    fn build_roadmap(improvements: &[Improvement]) -> Vec<RoadmapPhase> {
        let mut phases = vec![
            RoadmapPhase {
                phase: 1,
                horizon: "weeks".to_string(),
                improvement_ids: Vec::new(),
            },
            RoadmapPhase {
                phase: 2,
                horizon: "months".to_string(),
                improvement_ids: Vec::new(),
            },
            RoadmapPhase {
                phase: 3,
                horizon: "6-12 months".to_string(),
                improvement_ids: Vec::new(),
            },
        ];

        for improvement in improvements {
            let estimate = improvement.implementation_estimate.as_str();
            let bucket = if estimate.contains("6-12") {
                2
            } else if estimate.contains("month") {
                1
            } else {
                0
            };
            phases[bucket].improvement_ids.push(improvement.id.clone());
        }

        phases
    }

    fn improvement(
        improvement_type: ImprovementType,
        description: String,
        impact: String,
        estimate: &str,
    ) -> Improvement {
        Improvement {
            id: Uuid::new_v4().to_string(),
            improvement_type,
            description,
            impact,
            implementation_estimate: estimate.to_string(),
        }
    }
}
