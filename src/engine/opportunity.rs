// ==========================================
// 价值流图分析系统 - 改善机会规则引擎
// ==========================================
// 职责: 按固定阈值规则扫描指标, 产出带优先级的典型改善机会
// 红线: 规则命中顺序固定; 输出按优先级降序稳定排序
//       (同级保留生成顺序); ROI 为定性查表, 不是财务模型
// ==========================================
// 规则表 (生成顺序):
//   1. 瓶颈存在            → high
//   2. 库存过剩 (1.5×需求, 护栏 0.5 天) → high
//   3. 存在非增值工序      → medium
//   4. 缺陷率 > 2%         → medium
//   5. 换型负担 (> 50% 周期) → medium
//   6. 流动效率 < 30%      → high
// ==========================================

use crate::config::AnalysisConfig;
use crate::domain::types::{EffortClass, ImpactClass, OpportunityCategory, Priority};
use crate::domain::ValueStreamState;
use crate::engine::bottleneck::BottleneckAnalyzer;
use crate::engine::lead_time::LeadTimeEngine;
use crate::error::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::{debug, instrument};
use uuid::Uuid;

// ==========================================
// 结果对象
// ==========================================

/// 改善机会 (每次分析重新生成, 不持久化)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementOpportunity {
    pub id: String,
    pub category: OpportunityCategory,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub impact: ImpactClass,
    pub effort: EffortClass,
    /// 定性投入估算 (查表)
    pub estimated_cost: String,
    /// 定性收益估算 (查表)
    pub estimated_savings: String,
    /// 建议措施
    pub actions: Vec<String>,
}

// ==========================================
// OpportunityEngine - 改善机会规则引擎
// ==========================================
// 红线: 无状态引擎, 所有方法都是纯函数
pub struct OpportunityEngine {
    config: AnalysisConfig,
}

impl OpportunityEngine {
    /// 创建新的改善机会引擎
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

    /// 扫描价值流, 产出 0..N 条改善机会
    ///
    /// 空价值流返回空列表 (不是错误)
    #[instrument(skip(self, state), fields(process_count = state.processes.len()))]
    pub fn analyze(&self, state: &ValueStreamState) -> AnalysisResult<Vec<ImprovementOpportunity>> {
        state.takt_time()?;

        if state.is_empty() {
            return Ok(Vec::new());
        }

        let cfg = &self.config.opportunity;
        let lead_time = LeadTimeEngine::new(self.config.clone()).compute(state)?;
        let bottleneck = BottleneckAnalyzer::new(self.config.clone()).identify(state)?;

        let mut opportunities = Vec::new();

        // 规则1: 瓶颈工序
        if let Some(b) = &bottleneck {
            opportunities.push(self.opportunity(
                OpportunityCategory::Bottleneck,
                Priority::High,
                "Bottleneck process".to_string(),
                format!(
                    "Process \"{}\" constrains the stream (utilization {:.0}%, severity {})",
                    b.process_name,
                    b.utilization * 100.0,
                    b.severity
                ),
                ImpactClass::High,
                EffortClass::Medium,
                b.suggested_actions.clone(),
            ));
        }

        // 规则2: 库存过剩 (总库存 > 1.5 × 日需求, 且超出部分 > 0.5 天需求)
        let total_units = state.total_inventory_units();
        let excess_units = total_units - cfg.inventory_excess_ratio * state.daily_demand;
        if excess_units > cfg.inventory_excess_guard_days * state.daily_demand {
            opportunities.push(self.opportunity(
                OpportunityCategory::Inventory,
                Priority::High,
                "Excess inventory".to_string(),
                format!(
                    "Total inventory ({:.0} units) exceeds {:.1}x daily demand by {:.1} days of demand",
                    total_units,
                    cfg.inventory_excess_ratio,
                    excess_units / state.daily_demand
                ),
                ImpactClass::High,
                EffortClass::Low,
                vec![
                    "Introduce pull signals (kanban) between processes".to_string(),
                    "Reduce batch sizes to cut queue inventory".to_string(),
                ],
            ));
        }

        // 规则3: 非增值浪费
        let non_value_added = state.processes.iter().filter(|p| !p.value_added).count();
        if non_value_added >= 1 {
            opportunities.push(self.opportunity(
                OpportunityCategory::Waste,
                Priority::Medium,
                "Non-value-added processes".to_string(),
                format!(
                    "{} process(es) identified as non-value-adding",
                    non_value_added
                ),
                ImpactClass::Medium,
                EffortClass::Medium,
                vec![
                    "Evaluate whether these steps can be eliminated or combined with value-added steps"
                        .to_string(),
                ],
            ));
        }

        // 规则4: 质量缺陷 (缺陷率 = 1 - 平均合格率)
        let mean_yield: f64 = state.processes.iter().map(|p| p.yield_rate).sum::<f64>()
            / state.processes.len() as f64;
        let defect_rate = 1.0 - mean_yield;
        if defect_rate > cfg.defect_rate_threshold {
            opportunities.push(self.opportunity(
                OpportunityCategory::Quality,
                Priority::Medium,
                "Quality defects".to_string(),
                format!("Average defect rate is {:.1}%", defect_rate * 100.0),
                ImpactClass::High,
                EffortClass::Medium,
                vec![
                    "Apply root-cause analysis on the lowest-yield processes".to_string(),
                    "Introduce in-process quality checks (jidoka)".to_string(),
                ],
            ));
        }

        // 规则5: 换型负担 (setup_time > 50% cycle_time)
        let burdened: Vec<&str> = state
            .processes
            .iter()
            .filter(|p| p.setup_time > cfg.setup_burden_ratio * p.cycle_time)
            .map(|p| p.name.as_str())
            .collect();
        if !burdened.is_empty() {
            opportunities.push(self.opportunity(
                OpportunityCategory::Setup,
                Priority::Medium,
                "High setup time".to_string(),
                format!(
                    "{} process(es) have setup time above {:.0}% of cycle time: {}",
                    burdened.len(),
                    cfg.setup_burden_ratio * 100.0,
                    burdened.join(", ")
                ),
                ImpactClass::Medium,
                EffortClass::Low,
                vec!["Implement SMED (Single Minute Exchange of Die) techniques".to_string()],
            ));
        }

        // 规则6: 流动效率 (增值时间 / 总交付周期 < 30%)
        if lead_time.total_lead_time > 0.0
            && lead_time.process_cycle_efficiency < cfg.flow_efficiency_threshold_pct
        {
            opportunities.push(self.opportunity(
                OpportunityCategory::Flow,
                Priority::High,
                "Poor flow efficiency".to_string(),
                format!(
                    "Only {:.1}% of lead time is value-adding (target > {:.0}%)",
                    lead_time.process_cycle_efficiency, cfg.flow_efficiency_threshold_pct
                ),
                ImpactClass::High,
                EffortClass::High,
                vec![
                    "Create continuous flow between adjacent processes".to_string(),
                    "Cut waiting and queue time ahead of the constraint".to_string(),
                ],
            ));
        }

        // 按优先级降序稳定排序 (同级保留生成顺序)
        opportunities.sort_by_key(|o| Reverse(o.priority.rank()));

        debug!(count = opportunities.len(), "改善机会扫描完成");
        Ok(opportunities)
    }

    fn opportunity(
        &self,
        category: OpportunityCategory,
        priority: Priority,
        title: String,
        description: String,
        impact: ImpactClass,
        effort: EffortClass,
        actions: Vec<String>,
    ) -> ImprovementOpportunity {
        let roi = &self.config.opportunity.roi;
        ImprovementOpportunity {
            id: Uuid::new_v4().to_string(),
            category,
            priority,
            title,
            description,
            impact,
            effort,
            estimated_cost: roi.estimated_cost(effort).to_string(),
            estimated_savings: roi.estimated_savings(impact).to_string(),
            actions,
        }
    }
}
