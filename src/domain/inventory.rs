// ==========================================
// 价值流图分析系统 - 库存领域模型
// ==========================================
// 职责: 定义工序间/工序前的缓冲库存
// 说明: min_level <= reorder_point <= max_level 是目标属性,
//       违反时记录告警但不拒绝 (与源数据口径保持一致)
// ==========================================

use crate::domain::types::InventoryType;
use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

// ==========================================
// Inventory - 库存缓冲
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    // ===== 主键 =====
    pub id: String, // 库存唯一标识

    // ===== 基础信息 =====
    pub name: String,                     // 库存名称
    pub quantity: f64,                    // 当前数量 (件, >= 0)
    #[serde(default = "default_inventory_type")]
    pub inventory_type: InventoryType,    // 库存类型

    // ===== 水位参数 =====
    #[serde(default)]
    pub max_level: f64, // 最高水位
    #[serde(default)]
    pub min_level: f64, // 最低水位
    #[serde(default)]
    pub reorder_point: f64, // 补货点

    // ===== 补货与成本 =====
    #[serde(default)]
    pub lead_time_days: f64, // 补货提前期 (天)
    #[serde(default)]
    pub cost_per_unit: f64, // 单件成本 (>= 0)
}

fn default_inventory_type() -> InventoryType {
    InventoryType::Buffer
}

impl Inventory {
    /// 创建新库存缓冲
    pub fn new(id: impl Into<String>, name: impl Into<String>, quantity: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            inventory_type: InventoryType::Buffer,
            max_level: 0.0,
            min_level: 0.0,
            reorder_point: 0.0,
            lead_time_days: 0.0,
            cost_per_unit: 0.0,
        }
    }

    /// 校验库存不变量
    ///
    /// 水位次序 (min <= reorder <= max) 只告警不报错
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.name.trim().is_empty() {
            return Err(self.field_error("name", "库存名称不能为空"));
        }
        if self.quantity < 0.0 || !self.quantity.is_finite() {
            return Err(self.field_error("quantity", "库存数量必须 >= 0"));
        }
        if self.cost_per_unit < 0.0 || !self.cost_per_unit.is_finite() {
            return Err(self.field_error("cost_per_unit", "单件成本必须 >= 0"));
        }
        if self.lead_time_days < 0.0 || !self.lead_time_days.is_finite() {
            return Err(self.field_error("lead_time_days", "补货提前期必须 >= 0"));
        }

        // 目标属性检查: 违反只告警
        if self.max_level > 0.0
            && !(self.min_level <= self.reorder_point && self.reorder_point <= self.max_level)
        {
            warn!(
                inventory_id = %self.id,
                min_level = self.min_level,
                reorder_point = self.reorder_point,
                max_level = self.max_level,
                "库存水位次序违反目标属性 min <= reorder <= max"
            );
        }

        Ok(())
    }

    fn field_error(&self, field: &str, message: &str) -> AnalysisError {
        AnalysisError::InvalidInventory {
            inventory_id: self.id.clone(),
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}
