// ==========================================
// 价值流图分析系统 - 工序领域模型
// ==========================================
// 职责: 定义价值流中的单个工序步骤
// 红线: 默认值只在构造时填充, 公式内不做静默兜底
// 用途: UI/存储层写入, 引擎层只读 (未来状态投射除外, 在显式克隆上操作)
// ==========================================

use crate::domain::types::{FlowType, ProcessType};
use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};

// ===== 构造默认值 =====
pub const DEFAULT_UPTIME: f64 = 0.95;
pub const DEFAULT_YIELD: f64 = 0.98;

// ==========================================
// Process - 工序
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    // ===== 主键 =====
    pub id: String, // 工序唯一标识

    // ===== 基础信息 =====
    pub name: String, // 工序名称 (非空)

    // ===== 时间维度 =====
    pub cycle_time: f64, // 单件周期时间 (分钟/件, > 0)
    #[serde(default)]
    pub setup_time: f64, // 换型时间 (分钟/批次, >= 0)

    // ===== 资源维度 =====
    #[serde(default = "default_one")]
    pub batch_size: u32, // 批量 (>= 1)
    #[serde(default = "default_one")]
    pub operators: u32, // 操作工人数 (>= 1)
    #[serde(default = "default_one")]
    pub machines: u32, // 设备数 (>= 1)

    // ===== 效率维度 =====
    #[serde(default = "default_uptime")]
    pub uptime: f64, // 开动率 (0, 1]
    #[serde(default = "default_yield", rename = "yield")]
    pub yield_rate: f64, // 合格率 (0, 1]

    // ===== 分类维度 =====
    #[serde(default = "default_process_type")]
    pub process_type: ProcessType, // 工序类型
    #[serde(default = "default_value_added")]
    pub value_added: bool, // 是否增值工序
    #[serde(default = "default_flow_type")]
    pub flow_type: FlowType, // 流动方式

    // ===== 在制维度 =====
    #[serde(default)]
    pub inventory_before: f64, // 工序前在制数量 (件, >= 0)
    #[serde(default)]
    pub kanban_size: f64, // 看板数量 (件, >= 0, 仅 pull 模式有意义)
}

fn default_one() -> u32 {
    1
}

fn default_uptime() -> f64 {
    DEFAULT_UPTIME
}

fn default_yield() -> f64 {
    DEFAULT_YIELD
}

fn default_process_type() -> ProcessType {
    ProcessType::Manufacturing
}

fn default_value_added() -> bool {
    true
}

fn default_flow_type() -> FlowType {
    FlowType::Push
}

impl Process {
    /// 创建新工序, 未指定字段取构造默认值
    pub fn new(id: impl Into<String>, name: impl Into<String>, cycle_time: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cycle_time,
            setup_time: 0.0,
            batch_size: 1,
            operators: 1,
            machines: 1,
            uptime: DEFAULT_UPTIME,
            yield_rate: DEFAULT_YIELD,
            process_type: ProcessType::Manufacturing,
            value_added: true,
            flow_type: FlowType::Push,
            inventory_before: 0.0,
            kanban_size: 0.0,
        }
    }

    /// 校验工序不变量
    ///
    /// 规则:
    /// - name 非空
    /// - cycle_time > 0
    /// - setup_time >= 0
    /// - batch_size >= 1 (u32 下由 0 判定)
    /// - uptime, yield ∈ (0, 1]
    /// - inventory_before, kanban_size >= 0
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.name.trim().is_empty() {
            return Err(self.field_error("name", "工序名称不能为空"));
        }
        if self.cycle_time <= 0.0 || !self.cycle_time.is_finite() {
            return Err(self.field_error("cycle_time", "周期时间必须 > 0"));
        }
        if self.setup_time < 0.0 || !self.setup_time.is_finite() {
            return Err(self.field_error("setup_time", "换型时间必须 >= 0"));
        }
        if self.batch_size < 1 {
            return Err(self.field_error("batch_size", "批量必须 >= 1"));
        }
        if self.operators < 1 {
            return Err(self.field_error("operators", "操作工人数必须 >= 1"));
        }
        if self.machines < 1 {
            return Err(self.field_error("machines", "设备数必须 >= 1"));
        }
        if self.uptime <= 0.0 || self.uptime > 1.0 {
            return Err(self.field_error("uptime", "开动率必须在 (0, 1] 区间"));
        }
        if self.yield_rate <= 0.0 || self.yield_rate > 1.0 {
            return Err(self.field_error("yield", "合格率必须在 (0, 1] 区间"));
        }
        if self.inventory_before < 0.0 || !self.inventory_before.is_finite() {
            return Err(self.field_error("inventory_before", "工序前在制数量必须 >= 0"));
        }
        if self.kanban_size < 0.0 || !self.kanban_size.is_finite() {
            return Err(self.field_error("kanban_size", "看板数量必须 >= 0"));
        }
        Ok(())
    }

    /// 单件换型时间 = setup_time / batch_size
    pub fn setup_time_per_unit(&self) -> f64 {
        self.setup_time / self.batch_size as f64
    }

    fn field_error(&self, field: &str, message: &str) -> AnalysisError {
        AnalysisError::InvalidProcess {
            process_id: self.id.clone(),
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_defaults() {
        let p = Process::new("P1", "冲压", 2.5);
        assert_eq!(p.uptime, DEFAULT_UPTIME);
        assert_eq!(p.yield_rate, DEFAULT_YIELD);
        assert_eq!(p.batch_size, 1);
        assert!(p.value_added);
        assert_eq!(p.flow_type, FlowType::Push);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_cycle_time() {
        let p = Process::new("P1", "冲压", 0.0);
        let err = p.validate().unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidProcess { ref field, .. } if field == "cycle_time"));
    }

    #[test]
    fn test_validate_rejects_yield_out_of_range() {
        let mut p = Process::new("P1", "冲压", 2.0);
        p.yield_rate = 1.1;
        assert!(p.validate().is_err());
        p.yield_rate = 0.0;
        assert!(p.validate().is_err());
        p.yield_rate = 1.0;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_setup_time_per_unit() {
        let mut p = Process::new("P1", "冲压", 2.0);
        p.setup_time = 30.0;
        p.batch_size = 10;
        assert!((p.setup_time_per_unit() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_yield_serde_rename() {
        let p = Process::new("P1", "冲压", 2.0);
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("yield").is_some());
        assert!(json.get("yield_rate").is_none());
    }
}
