// ==========================================
// 价值流图分析系统 - 分析 API
// ==========================================
// 职责: 聚合各引擎, 暴露面向协作方的功能面
// 红线: 全部同步纯计算 (full_report 的时间戳除外);
//       校验失败时不修改任何状态, 协作方可提示用户后重试
// ==========================================

use crate::config::{AnalysisConfig, FutureStateTargets};
use crate::domain::ValueStreamState;
use crate::engine::{
    Bottleneck, BottleneckAnalyzer, FutureStateProjector, FutureStateResult,
    ImprovementOpportunity, LeadTimeEngine, LeadTimeResult, LeanMetrics, LeanMetricsEngine,
    LittlesLawResult, OpportunityEngine, SimulationResult, TaktResult,
};
use crate::engine::bottleneck::ImprovementLever;
use crate::error::AnalysisResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

// ==========================================
// AnalysisReport - 一次性全量分析报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// 报告生成时间 (审计字段, 由 API 层盖章)
    pub generated_at: DateTime<Utc>,
    pub takt_time: TaktResult,
    pub lead_time: LeadTimeResult,
    pub littles_law: LittlesLawResult,
    pub metrics: LeanMetrics,
    pub bottleneck: Option<Bottleneck>,
    pub opportunities: Vec<ImprovementOpportunity>,
    pub future_state: FutureStateResult,
}

// ==========================================
// AnalysisApi - 分析接口
// ==========================================
pub struct AnalysisApi {
    config: AnalysisConfig,
}

impl AnalysisApi {
    /// 创建新的分析 API
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self::new(AnalysisConfig::default())
    }

    // ==========================================
    // 功能面 (与协作方约定的六个操作)
    // ==========================================

    /// 节拍时间
    pub fn compute_takt_time(
        &self,
        daily_demand: f64,
        available_time: f64,
    ) -> AnalysisResult<TaktResult> {
        LeadTimeEngine::takt_time(daily_demand, available_time)
    }

    /// 价值流交付周期
    pub fn compute_lead_time(&self, state: &ValueStreamState) -> AnalysisResult<LeadTimeResult> {
        LeadTimeEngine::new(self.config.clone()).compute(state)
    }

    /// 精益指标全集
    pub fn compute_lean_metrics(&self, state: &ValueStreamState) -> AnalysisResult<LeanMetrics> {
        LeanMetricsEngine::new(self.config.clone()).compute(state)
    }

    /// 瓶颈识别 (空价值流返回 None)
    pub fn identify_bottleneck(
        &self,
        state: &ValueStreamState,
    ) -> AnalysisResult<Option<Bottleneck>> {
        BottleneckAnalyzer::new(self.config.clone()).identify(state)
    }

    /// 瓶颈 what-if 改善模拟 (非提交查询)
    pub fn simulate_bottleneck_improvement(
        &self,
        state: &ValueStreamState,
        lever: ImprovementLever,
        value: f64,
    ) -> AnalysisResult<Option<SimulationResult>> {
        BottleneckAnalyzer::new(self.config.clone()).simulate_improvement(state, lever, value)
    }

    /// 改善机会扫描
    pub fn analyze_improvement_opportunities(
        &self,
        state: &ValueStreamState,
    ) -> AnalysisResult<Vec<ImprovementOpportunity>> {
        OpportunityEngine::new(self.config.clone()).analyze(state)
    }

    /// 未来状态投射
    pub fn project_future_state(
        &self,
        state: &ValueStreamState,
        targets: &FutureStateTargets,
    ) -> AnalysisResult<FutureStateResult> {
        FutureStateProjector::new(self.config.clone()).project(state, targets)
    }

    // ==========================================
    // 聚合报告
    // ==========================================

    /// 一次性全量分析报告 (供报表/导出协作方)
    ///
    /// 未来状态投射使用配置中的默认改善目标
    pub fn full_report(&self, state: &ValueStreamState) -> AnalysisResult<AnalysisReport> {
        state.validate()?;

        let lead_time_engine = LeadTimeEngine::new(self.config.clone());
        let report = AnalysisReport {
            generated_at: Utc::now(),
            takt_time: LeadTimeEngine::takt_time(state.daily_demand, state.available_time)?,
            lead_time: lead_time_engine.compute(state)?,
            littles_law: lead_time_engine.littles_law_check(state)?,
            metrics: self.compute_lean_metrics(state)?,
            bottleneck: self.identify_bottleneck(state)?,
            opportunities: self.analyze_improvement_opportunities(state)?,
            future_state: self.project_future_state(state, &self.config.future_state)?,
        };

        info!(
            process_count = state.processes.len(),
            opportunity_count = report.opportunities.len(),
            "全量分析报告生成完成"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Process;
    use crate::error::AnalysisError;

    #[test]
    fn test_takt_time_pass_through() {
        let api = AnalysisApi::with_defaults();
        let takt = api.compute_takt_time(48.0, 480.0).unwrap();
        assert_eq!(takt.takt_time, 10.0);
    }

    #[test]
    fn test_full_report_empty_stream_is_defined() {
        let api = AnalysisApi::with_defaults();
        let state = ValueStreamState::new(48.0, 480.0);
        let report = api.full_report(&state).unwrap();
        assert!(report.bottleneck.is_none());
        assert!(report.opportunities.is_empty());
        assert_eq!(report.metrics.oee.value, 0.0);
    }

    #[test]
    fn test_full_report_rejects_invalid_process_without_mutation() {
        let api = AnalysisApi::with_defaults();
        let mut state = ValueStreamState::new(48.0, 480.0);
        state.processes.push(Process::new("P1", "冲压", -1.0));
        let snapshot = state.clone();
        assert!(matches!(
            api.full_report(&state),
            Err(AnalysisError::InvalidProcess { .. })
        ));
        assert_eq!(state, snapshot);
    }
}
