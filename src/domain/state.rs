// ==========================================
// 价值流图分析系统 - 价值流聚合状态
// ==========================================
// 职责: 引擎层操作的聚合根 (工序序列 + 库存集合 + 需求输入)
// 红线: 引擎按值快照读取, 不持有可变全局;
//       takt_time 是派生量, 永不独立持久化
// 说明: 工序顺序即流动位置, 顺序有业务含义
// ==========================================

use crate::domain::{Inventory, Process};
use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};

// ==========================================
// ValueStreamState - 价值流状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueStreamState {
    /// 工序序列 (顺序 = 流动位置)
    pub processes: Vec<Process>,

    /// 库存集合
    #[serde(default)]
    pub inventories: Vec<Inventory>,

    /// 日需求量 (件/天, > 0)
    pub daily_demand: f64,

    /// 可用生产时间 (分钟/期间, > 0)
    pub available_time: f64,
}

impl ValueStreamState {
    /// 创建新的价值流状态
    pub fn new(daily_demand: f64, available_time: f64) -> Self {
        Self {
            processes: Vec::new(),
            inventories: Vec::new(),
            daily_demand,
            available_time,
        }
    }

    /// 节拍时间 (分钟/件) = 可用时间 / 日需求量
    ///
    /// 派生量, 每次调用由输入重新计算
    pub fn takt_time(&self) -> AnalysisResult<f64> {
        if self.daily_demand <= 0.0 || self.available_time <= 0.0 {
            return Err(AnalysisError::InvalidDemand {
                daily_demand: self.daily_demand,
                available_time: self.available_time,
            });
        }
        Ok(self.available_time / self.daily_demand)
    }

    /// 校验整个聚合: 需求输入 + 所有工序 + 所有库存
    ///
    /// 失败时不修改任何状态, 调用方可安全重试
    pub fn validate(&self) -> AnalysisResult<()> {
        self.takt_time()?;
        for process in &self.processes {
            process.validate()?;
        }
        for inventory in &self.inventories {
            inventory.validate()?;
        }
        Ok(())
    }

    /// 价值流是否为空 (无工序)
    ///
    /// 空价值流不是错误: 下游指标计算返回零值结果
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// 总库存件数 = 库存集合数量 + 各工序前在制数量
    pub fn total_inventory_units(&self) -> f64 {
        let buffer_units: f64 = self.inventories.iter().map(|i| i.quantity).sum();
        let wip_units: f64 = self.processes.iter().map(|p| p.inventory_before).sum();
        buffer_units + wip_units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_takt_time_basic() {
        let state = ValueStreamState::new(48.0, 480.0);
        assert!((state.takt_time().unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_takt_time_invalid_demand() {
        let state = ValueStreamState::new(0.0, 480.0);
        assert!(matches!(
            state.takt_time(),
            Err(AnalysisError::InvalidDemand { .. })
        ));
    }

    #[test]
    fn test_total_inventory_units_counts_wip() {
        let mut state = ValueStreamState::new(100.0, 480.0);
        state.inventories.push(Inventory::new("I1", "缓冲", 30.0));
        let mut p = Process::new("P1", "装配", 2.0);
        p.inventory_before = 12.0;
        state.processes.push(p);
        assert!((state.total_inventory_units() - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_propagates_process_error() {
        let mut state = ValueStreamState::new(100.0, 480.0);
        state.processes.push(Process::new("P1", "", 2.0));
        assert!(matches!(
            state.validate(),
            Err(AnalysisError::InvalidProcess { .. })
        ));
    }

    #[test]
    fn test_serde_round_trip_preserves_state() {
        let mut state = ValueStreamState::new(48.0, 480.0);
        state.processes.push(Process::new("P1", "冲压", 10.0));
        state.inventories.push(Inventory::new("I1", "缓冲", 5.0));
        let json = serde_json::to_string(&state).unwrap();
        let back: ValueStreamState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
