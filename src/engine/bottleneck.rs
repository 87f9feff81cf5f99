// ==========================================
// 价值流图分析系统 - 瓶颈识别引擎
// ==========================================
// 职责: 识别约束工序、判定严重度、生成改善建议、what-if 模拟
// 红线: 单一选择口径 — 利用率严格最高者胜出,
//       并列时 flow_impact > 门槛者优先; 不允许第二套判据
// 说明: 模拟是非提交的 what-if 查询, 只在克隆工序上计算,
//       永不写回真实状态
// ==========================================
// 输入: ValueStreamState (按值快照)
// 输出: Bottleneck (瞬态派生视图, 每次查询重算, 不持久化)
// ==========================================

use crate::config::AnalysisConfig;
use crate::domain::types::BottleneckSeverity;
use crate::domain::{Process, ValueStreamState};
use crate::error::AnalysisResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

// 利用率并列判定容差
const UTILIZATION_EPS: f64 = 1e-9;

// ==========================================
// 结果对象
// ==========================================

/// 瓶颈 (派生视图)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    /// 工序标识
    pub process_id: String,
    /// 工序名称
    pub process_name: String,
    /// 流动位置 (0 起)
    pub position: usize,
    /// 利用率 = cycle_time / takt_time
    pub utilization: f64,
    /// 流动影响评分
    pub flow_impact: f64,
    /// 严重度等级
    pub severity: BottleneckSeverity,
    /// 是否关键瓶颈 (utilization > 1 或 flow_impact > 0.9)
    pub is_critical: bool,
    /// 改善建议
    pub suggested_actions: Vec<String>,
}

/// what-if 模拟的改善杠杆
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementLever {
    /// cycle_time × value
    CycleTime,
    /// setup_time × value
    SetupTime,
    /// machines + value
    Machines,
    /// uptime + value (上限 1.0)
    Uptime,
}

/// 模拟后的下一个最高利用率工序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextBottleneck {
    pub process_id: String,
    pub process_name: String,
    pub utilization: f64,
}

/// what-if 模拟结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub process_id: String,
    pub lever: ImprovementLever,
    pub value: f64,
    pub utilization_before: f64,
    pub utilization_after: f64,
    /// 模拟后利用率仍 > 0.9
    pub still_bottleneck: bool,
    /// 其余工序中利用率最高者
    pub next_bottleneck: Option<NextBottleneck>,
}

// 逐工序评分中间量
struct ProcessScore {
    index: usize,
    utilization: f64,
    flow_impact: f64,
}

// ==========================================
// BottleneckAnalyzer - 瓶颈识别引擎
// ==========================================
// 红线: 无状态引擎, 所有方法都是纯函数
pub struct BottleneckAnalyzer {
    config: AnalysisConfig,
}

impl BottleneckAnalyzer {
    /// 创建新的瓶颈识别引擎
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

    /// 识别约束工序
    ///
    /// 评分公式:
    /// - utilization = cycle_time / takt_time
    /// - flow_impact = position_impact × redundancy - buffer_protection × 0.3
    ///   - position_impact = (index + 1) / process_count (后段工序权重更高)
    ///   - redundancy = 0.8 (machines > 1) 否则 1.0
    ///   - buffer_protection = min(1, inventory_before / 10)
    ///
    /// 选择规则: 利用率严格最高者胜出;
    /// 并列时 flow_impact > 0.8 的候选优先, 否则保留先出现者
    ///
    /// 空价值流返回 None (不是错误)
    #[instrument(skip(self, state), fields(process_count = state.processes.len()))]
    pub fn identify(&self, state: &ValueStreamState) -> AnalysisResult<Option<Bottleneck>> {
        let takt = state.takt_time()?;

        if state.is_empty() {
            return Ok(None);
        }

        let scores = self.score_processes(&state.processes, takt);

        let mut best: &ProcessScore = &scores[0];
        for candidate in &scores[1..] {
            if candidate.utilization > best.utilization + UTILIZATION_EPS {
                best = candidate;
            } else if (candidate.utilization - best.utilization).abs() <= UTILIZATION_EPS
                && candidate.flow_impact > self.config.bottleneck.tie_break_flow_impact
                && best.flow_impact <= self.config.bottleneck.tie_break_flow_impact
            {
                best = candidate;
            }
        }

        let process = &state.processes[best.index];
        let severity = self.classify_severity(best.utilization);
        let is_critical = best.utilization > self.config.bottleneck.bottleneck_threshold
            || best.flow_impact > self.config.bottleneck.critical_flow_impact;

        debug!(
            process_id = %process.id,
            utilization = best.utilization,
            flow_impact = best.flow_impact,
            severity = %severity,
            "瓶颈识别完成"
        );

        Ok(Some(Bottleneck {
            process_id: process.id.clone(),
            process_name: process.name.clone(),
            position: best.index,
            utilization: best.utilization,
            flow_impact: best.flow_impact,
            severity,
            is_critical,
            suggested_actions: self.suggest_actions(process, takt),
        }))
    }

    /// what-if 改善模拟
    ///
    /// 在瓶颈工序的克隆上施加单一杠杆并重算利用率;
    /// 非提交查询, 真实状态保持不变
    pub fn simulate_improvement(
        &self,
        state: &ValueStreamState,
        lever: ImprovementLever,
        value: f64,
    ) -> AnalysisResult<Option<SimulationResult>> {
        let takt = state.takt_time()?;

        let bottleneck = match self.identify(state)? {
            Some(b) => b,
            None => return Ok(None),
        };

        // 在克隆上施加杠杆
        let mut candidate = state.processes[bottleneck.position].clone();
        match lever {
            ImprovementLever::CycleTime => candidate.cycle_time *= value,
            ImprovementLever::SetupTime => candidate.setup_time *= value,
            ImprovementLever::Machines => {
                candidate.machines = ((candidate.machines as f64 + value).max(1.0)) as u32;
            }
            ImprovementLever::Uptime => {
                candidate.uptime = (candidate.uptime + value).min(1.0);
            }
        }

        let utilization_after = candidate.cycle_time / takt;
        let still_bottleneck =
            utilization_after > self.config.bottleneck.simulation_residual_threshold;

        // 其余工序中利用率最高者
        let next_bottleneck = state
            .processes
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != bottleneck.position)
            .map(|(_, p)| (p, p.cycle_time / takt))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(p, utilization)| NextBottleneck {
                process_id: p.id.clone(),
                process_name: p.name.clone(),
                utilization,
            });

        Ok(Some(SimulationResult {
            process_id: bottleneck.process_id,
            lever,
            value,
            utilization_before: bottleneck.utilization,
            utilization_after,
            still_bottleneck,
            next_bottleneck,
        }))
    }

    // ==========================================
    // 内部评分与规则
    // ==========================================

    fn score_processes(&self, processes: &[Process], takt: f64) -> Vec<ProcessScore> {
        let count = processes.len() as f64;
        let cfg = &self.config.bottleneck;

        processes
            .iter()
            .enumerate()
            .map(|(index, p)| {
                let utilization = p.cycle_time / takt;
                let position_impact = (index as f64 + 1.0) / count;
                let redundancy = if p.machines > 1 {
                    cfg.redundancy_factor
                } else {
                    1.0
                };
                let buffer_protection =
                    (p.inventory_before / cfg.buffer_protection_divisor).min(1.0);
                let flow_impact = position_impact * redundancy
                    - buffer_protection * cfg.buffer_protection_weight;

                ProcessScore {
                    index,
                    utilization,
                    flow_impact,
                }
            })
            .collect()
    }

    /// 按利用率阈值带判定严重度
    fn classify_severity(&self, utilization: f64) -> BottleneckSeverity {
        let cfg = &self.config.bottleneck;
        if utilization > cfg.critical_threshold {
            BottleneckSeverity::CriticalBottleneck
        } else if utilization > cfg.bottleneck_threshold {
            BottleneckSeverity::Bottleneck
        } else if utilization > cfg.potential_threshold {
            BottleneckSeverity::PotentialBottleneck
        } else if utilization > cfg.constraint_threshold {
            BottleneckSeverity::CapacityConstraint
        } else {
            BottleneckSeverity::Balanced
        }
    }

    /// 固定建议规则 (每条建议对应一个命中条件)
    fn suggest_actions(&self, process: &Process, takt: f64) -> Vec<String> {
        let mut actions = Vec::new();

        if process.cycle_time > takt {
            actions.push(format!(
                "Reduce cycle time below takt time ({:.2} min) through work balancing or method improvement",
                takt
            ));
        }
        if process.setup_time > 0.0 {
            actions.push(
                "Cut setup time by 50% using quick-changeover (SMED) techniques".to_string(),
            );
        }
        if process.machines < 2 {
            actions.push("Add a parallel machine to split the load".to_string());
        }
        if process.uptime < self.config.bottleneck.uptime_suggestion_threshold {
            actions.push(
                "Launch a preventive maintenance program to raise equipment uptime".to_string(),
            );
        }

        actions
    }
}
