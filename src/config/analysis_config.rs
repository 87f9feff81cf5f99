// ==========================================
// 价值流图分析系统 - 分析配置
// ==========================================
// 职责: 阈值带、搬运时间常量、ROI 查表、未来状态改善目标
// 说明: 全部字段带 serde 默认值, 可由调用方覆写后整体传入,
//       无需改代码即可调参
// ==========================================

use crate::domain::types::{EffortClass, ImpactClass, MetricStatus};
use serde::{Deserialize, Serialize};

// ==========================================
// MetricBands - 单指标阈值带
// ==========================================
// 判定规则 (higher_is_better=true):
//   value > excellent → excellent
//   value > good      → good
//   value > fair      → fair
//   其余              → poor
// higher_is_better=false 时比较方向取反 (value < 阈值)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBands {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    #[serde(default = "default_true")]
    pub higher_is_better: bool,
}

fn default_true() -> bool {
    true
}

impl MetricBands {
    pub fn new(excellent: f64, good: f64, fair: f64) -> Self {
        Self {
            excellent,
            good,
            fair,
            higher_is_better: true,
        }
    }

    pub fn lower_is_better(excellent: f64, good: f64, fair: f64) -> Self {
        Self {
            excellent,
            good,
            fair,
            higher_is_better: false,
        }
    }

    /// 按阈值带判定指标状态
    pub fn classify(&self, value: f64) -> MetricStatus {
        if self.higher_is_better {
            if value > self.excellent {
                MetricStatus::Excellent
            } else if value > self.good {
                MetricStatus::Good
            } else if value > self.fair {
                MetricStatus::Fair
            } else {
                MetricStatus::Poor
            }
        } else if value < self.excellent {
            MetricStatus::Excellent
        } else if value < self.good {
            MetricStatus::Good
        } else if value < self.fair {
            MetricStatus::Fair
        } else {
            MetricStatus::Poor
        }
    }
}

// ==========================================
// MetricThresholds - 精益指标阈值带全集
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricThresholds {
    /// 流程周期效率 PCE (%): >25 excellent / >15 good / >5 fair
    pub pce: MetricBands,
    /// OEE (%): >85 / >70 / >50
    pub oee: MetricBands,
    /// 一次通过率 FTT (%): >95 / >85 / >70
    pub first_time_through: MetricBands,
    /// 增值比率 (%): 与 PCE 同带
    pub value_added_ratio: MetricBands,
    /// 库存天数 (天, 越低越好): <2 / <5 / <10
    pub days_of_inventory: MetricBands,
    /// 产能利用率 (%, 越低越好, >100 表示超负荷): <80 / <90 / <100
    pub capacity_utilization: MetricBands,
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self {
            pce: MetricBands::new(25.0, 15.0, 5.0),
            oee: MetricBands::new(85.0, 70.0, 50.0),
            first_time_through: MetricBands::new(95.0, 85.0, 70.0),
            value_added_ratio: MetricBands::new(25.0, 15.0, 5.0),
            days_of_inventory: MetricBands::lower_is_better(2.0, 5.0, 10.0),
            capacity_utilization: MetricBands::lower_is_better(80.0, 90.0, 100.0),
        }
    }
}

// ==========================================
// BottleneckConfig - 瓶颈识别参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BottleneckConfig {
    // ===== 严重度阈值带 (按利用率) =====
    pub critical_threshold: f64,   // > 1.2 → critical_bottleneck
    pub bottleneck_threshold: f64, // > 1.0 → bottleneck
    pub potential_threshold: f64,  // > 0.9 → potential_bottleneck
    pub constraint_threshold: f64, // > 0.8 → capacity_constraint

    // ===== 流动影响评分参数 =====
    pub redundancy_factor: f64,        // machines > 1 时的冗余折减 (0.8)
    pub buffer_protection_divisor: f64, // buffer_protection = min(1, inv/10)
    pub buffer_protection_weight: f64,  // 缓冲保护权重 (0.3)
    pub tie_break_flow_impact: f64,     // 利用率并列时的 flow_impact 门槛 (0.8)
    pub critical_flow_impact: f64,      // is_critical 的 flow_impact 门槛 (0.9)

    // ===== 建议规则参数 =====
    pub uptime_suggestion_threshold: f64, // uptime < 0.95 → 建议维护计划

    // ===== 模拟参数 =====
    pub simulation_residual_threshold: f64, // 模拟后 utilization > 0.9 仍视为瓶颈
}

impl Default for BottleneckConfig {
    fn default() -> Self {
        Self {
            critical_threshold: 1.2,
            bottleneck_threshold: 1.0,
            potential_threshold: 0.9,
            constraint_threshold: 0.8,
            redundancy_factor: 0.8,
            buffer_protection_divisor: 10.0,
            buffer_protection_weight: 0.3,
            tie_break_flow_impact: 0.8,
            critical_flow_impact: 0.9,
            uptime_suggestion_threshold: 0.95,
            simulation_residual_threshold: 0.9,
        }
    }
}

// ==========================================
// RoiTable - 定性 ROI 查表
// ==========================================
// 红线: 这是固定启发式查表, 不是财务模型,
//       不从用户的实际财务数据计算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiTable {
    pub cost_effort_high: String,
    pub cost_effort_medium: String,
    pub cost_effort_low: String,
    pub savings_impact_high: String,
    pub savings_impact_medium: String,
    pub savings_impact_low: String,
}

impl Default for RoiTable {
    fn default() -> Self {
        Self {
            cost_effort_high: "$50,000+".to_string(),
            cost_effort_medium: "$10,000 - $50,000".to_string(),
            cost_effort_low: "< $10,000".to_string(),
            savings_impact_high: "$100,000+ / year".to_string(),
            savings_impact_medium: "$25,000 - $100,000 / year".to_string(),
            savings_impact_low: "< $25,000 / year".to_string(),
        }
    }
}

impl RoiTable {
    pub fn estimated_cost(&self, effort: EffortClass) -> &str {
        match effort {
            EffortClass::High => &self.cost_effort_high,
            EffortClass::Medium => &self.cost_effort_medium,
            EffortClass::Low => &self.cost_effort_low,
        }
    }

    pub fn estimated_savings(&self, impact: ImpactClass) -> &str {
        match impact {
            ImpactClass::High => &self.savings_impact_high,
            ImpactClass::Medium => &self.savings_impact_medium,
            ImpactClass::Low => &self.savings_impact_low,
        }
    }
}

// ==========================================
// OpportunityConfig - 改善机会规则阈值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpportunityConfig {
    /// 库存过剩判定倍率 (总库存 > 倍率 × 日需求)
    pub inventory_excess_ratio: f64,
    /// 库存过剩护栏 (超出部分 > 护栏天数 × 日需求才触发)
    pub inventory_excess_guard_days: f64,
    /// 缺陷率阈值 (1 - 平均合格率 > 阈值)
    pub defect_rate_threshold: f64,
    /// 流动效率阈值 (% , 增值时间/总交付周期 < 阈值)
    pub flow_efficiency_threshold_pct: f64,
    /// 换型负担倍率 (setup_time > 倍率 × cycle_time)
    pub setup_burden_ratio: f64,
    /// ROI 查表
    pub roi: RoiTable,
}

impl Default for OpportunityConfig {
    fn default() -> Self {
        Self {
            inventory_excess_ratio: 1.5,
            inventory_excess_guard_days: 0.5,
            defect_rate_threshold: 0.02,
            flow_efficiency_threshold_pct: 30.0,
            setup_burden_ratio: 0.5,
            roi: RoiTable::default(),
        }
    }
}

// ==========================================
// FutureStateTargets - 未来状态改善目标
// ==========================================
// 投射管线五个固定步骤的参数, 顺序见引擎层
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FutureStateTargets {
    // ===== 步骤1: 瓶颈改善 =====
    pub bottleneck_cycle_time_factor: f64, // cycle_time × 0.85
    pub bottleneck_uptime_gain: f64,       // uptime + 0.05
    pub bottleneck_uptime_cap: f64,        // 上限 0.98
    pub setup_reduction_factor: f64,       // setup_time × 0.5 (仅 > 0 时)

    // ===== 步骤2: 库存削减 =====
    pub inventory_reduction_target: f64, // 削减比例 (0~1)

    // ===== 步骤3: 浪费消除 =====
    pub waste_savings_ratio: f64, // savings = cost × 0.8

    // ===== 步骤4: 流动改善 =====
    pub flow_push_inventory_threshold: f64, // push 且 inventory_before > 5 转 pull
    pub kanban_ratio: f64,                  // kanban = ceil(inv × 0.5)

    // ===== 步骤5: 质量提升 =====
    pub quality_improvement_target: f64, // yield + 目标值
    pub yield_cap: f64,                  // 上限 0.999
}

impl Default for FutureStateTargets {
    fn default() -> Self {
        Self {
            bottleneck_cycle_time_factor: 0.85,
            bottleneck_uptime_gain: 0.05,
            bottleneck_uptime_cap: 0.98,
            setup_reduction_factor: 0.5,
            inventory_reduction_target: 0.30,
            waste_savings_ratio: 0.8,
            flow_push_inventory_threshold: 5.0,
            kanban_ratio: 0.5,
            quality_improvement_target: 0.01,
            yield_cap: 0.999,
        }
    }
}

// ==========================================
// AnalysisConfig - 分析配置聚合
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 工序间搬运时间 (分钟, 交付周期公式中的 move_time 项)
    pub move_time_min: f64,

    /// 是否计入排队时间项 (简化口径 = move_time_min=0 且关闭此项,
    /// 不是独立公式路径)
    pub include_queue_time: bool,

    /// OEE 性能系数 (当前固定 1.0, 预留扩展位)
    pub performance_factor: f64,

    /// 指标阈值带
    pub thresholds: MetricThresholds,

    /// 瓶颈识别参数
    pub bottleneck: BottleneckConfig,

    /// 改善机会规则阈值
    pub opportunity: OpportunityConfig,

    /// 未来状态改善目标默认值
    pub future_state: FutureStateTargets,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            move_time_min: 5.0,
            include_queue_time: true,
            performance_factor: 1.0,
            thresholds: MetricThresholds::default(),
            bottleneck: BottleneckConfig::default(),
            opportunity: OpportunityConfig::default(),
            future_state: FutureStateTargets::default(),
        }
    }
}

impl AnalysisConfig {
    /// 简化交付周期口径: 不计搬运与排队项
    ///
    /// 与默认口径共用同一公式路径, 只是把可选项清零
    pub fn simplified() -> Self {
        Self {
            move_time_min: 0.0,
            include_queue_time: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pce_bands() {
        let bands = MetricThresholds::default().pce;
        assert_eq!(bands.classify(30.0), MetricStatus::Excellent);
        assert_eq!(bands.classify(20.0), MetricStatus::Good);
        assert_eq!(bands.classify(10.0), MetricStatus::Fair);
        assert_eq!(bands.classify(3.0), MetricStatus::Poor);
    }

    #[test]
    fn test_lower_is_better_bands() {
        let bands = MetricThresholds::default().days_of_inventory;
        assert_eq!(bands.classify(1.0), MetricStatus::Excellent);
        assert_eq!(bands.classify(3.0), MetricStatus::Good);
        assert_eq!(bands.classify(7.0), MetricStatus::Fair);
        assert_eq!(bands.classify(15.0), MetricStatus::Poor);
    }

    #[test]
    fn test_config_deserialize_with_partial_override() {
        // 只覆写搬运时间, 其余取默认
        let cfg: AnalysisConfig = serde_json::from_str(r#"{"move_time_min": 2.0}"#).unwrap();
        assert_eq!(cfg.move_time_min, 2.0);
        assert!(cfg.include_queue_time);
        assert_eq!(cfg.bottleneck.critical_threshold, 1.2);
    }

    #[test]
    fn test_simplified_profile_zeroes_optional_terms() {
        let cfg = AnalysisConfig::simplified();
        assert_eq!(cfg.move_time_min, 0.0);
        assert!(!cfg.include_queue_time);
    }
}
