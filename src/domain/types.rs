// ==========================================
// 价值流图分析系统 - 领域类型定义
// ==========================================
// 依据: 精益生产 VSM 标准方法
// 序列化格式: snake_case (与前端/报表层约定一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 工序类型 (Process Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessType {
    Manufacturing, // 制造
    Assembly,      // 装配
    Inspection,    // 检验
    Testing,       // 测试
    Packaging,     // 包装
    Shipping,      // 发运
}

impl fmt::Display for ProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessType::Manufacturing => write!(f, "manufacturing"),
            ProcessType::Assembly => write!(f, "assembly"),
            ProcessType::Inspection => write!(f, "inspection"),
            ProcessType::Testing => write!(f, "testing"),
            ProcessType::Packaging => write!(f, "packaging"),
            ProcessType::Shipping => write!(f, "shipping"),
        }
    }
}

// ==========================================
// 流动方式 (Flow Type)
// ==========================================
// push: 按预测推动生产; pull: 按下游消耗信号拉动
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowType {
    Push, // 推动式
    Pull, // 拉动式
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowType::Push => write!(f, "push"),
            FlowType::Pull => write!(f, "pull"),
        }
    }
}

// ==========================================
// 库存类型 (Inventory Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryType {
    Buffer,      // 缓冲库存
    Supermarket, // 超市库存
    Fifo,        // FIFO 通道
    SafetyStock, // 安全库存
}

impl fmt::Display for InventoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryType::Buffer => write!(f, "buffer"),
            InventoryType::Supermarket => write!(f, "supermarket"),
            InventoryType::Fifo => write!(f, "fifo"),
            InventoryType::SafetyStock => write!(f, "safety_stock"),
        }
    }
}

// ==========================================
// 瓶颈严重度 (Bottleneck Severity)
// ==========================================
// 红线: 等级制, 由利用率阈值带判定, 不是评分制
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleneckSeverity {
    CriticalBottleneck,  // 利用率 > 1.2
    Bottleneck,          // 利用率 > 1.0
    PotentialBottleneck, // 利用率 > 0.9
    CapacityConstraint,  // 利用率 > 0.8
    Balanced,            // 其余
}

impl fmt::Display for BottleneckSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BottleneckSeverity::CriticalBottleneck => write!(f, "critical_bottleneck"),
            BottleneckSeverity::Bottleneck => write!(f, "bottleneck"),
            BottleneckSeverity::PotentialBottleneck => write!(f, "potential_bottleneck"),
            BottleneckSeverity::CapacityConstraint => write!(f, "capacity_constraint"),
            BottleneckSeverity::Balanced => write!(f, "balanced"),
        }
    }
}

// ==========================================
// 优先级 (Priority)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// 优先级排序权重 (high=3, medium=2, low=1)
    pub fn rank(&self) -> i32 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

// ==========================================
// 影响等级 / 投入等级 (Impact / Effort Class)
// ==========================================
// 用于改善机会的定性 ROI 估算, 不是财务模型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactClass {
    High,
    Medium,
    Low,
}

impl fmt::Display for ImpactClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactClass::High => write!(f, "high"),
            ImpactClass::Medium => write!(f, "medium"),
            ImpactClass::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffortClass {
    High,
    Medium,
    Low,
}

impl fmt::Display for EffortClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffortClass::High => write!(f, "high"),
            EffortClass::Medium => write!(f, "medium"),
            EffortClass::Low => write!(f, "low"),
        }
    }
}

// ==========================================
// 改善机会类别 (Opportunity Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityCategory {
    Bottleneck, // 瓶颈工序
    Inventory,  // 库存过剩
    Waste,      // 非增值浪费
    Quality,    // 质量缺陷
    Setup,      // 换型负担
    Flow,       // 流动效率
}

impl fmt::Display for OpportunityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpportunityCategory::Bottleneck => write!(f, "bottleneck"),
            OpportunityCategory::Inventory => write!(f, "inventory"),
            OpportunityCategory::Waste => write!(f, "waste"),
            OpportunityCategory::Quality => write!(f, "quality"),
            OpportunityCategory::Setup => write!(f, "setup"),
            OpportunityCategory::Flow => write!(f, "flow"),
        }
    }
}

// ==========================================
// 未来状态改善类型 (Improvement Type)
// ==========================================
// 与未来状态投射管线的五个固定步骤一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementType {
    BottleneckImprovement, // 瓶颈改善
    InventoryReduction,    // 库存削减
    WasteElimination,      // 浪费消除
    FlowImprovement,       // 流动改善
    QualityEnhancement,    // 质量提升
}

impl fmt::Display for ImprovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImprovementType::BottleneckImprovement => write!(f, "bottleneck_improvement"),
            ImprovementType::InventoryReduction => write!(f, "inventory_reduction"),
            ImprovementType::WasteElimination => write!(f, "waste_elimination"),
            ImprovementType::FlowImprovement => write!(f, "flow_improvement"),
            ImprovementType::QualityEnhancement => write!(f, "quality_enhancement"),
        }
    }
}

// ==========================================
// 指标状态带 (Metric Status)
// ==========================================
// 由配置层阈值带判定, 引擎内不出现魔法数字
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricStatus::Excellent => write!(f, "excellent"),
            MetricStatus::Good => write!(f, "good"),
            MetricStatus::Fair => write!(f, "fair"),
            MetricStatus::Poor => write!(f, "poor"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
    }

    #[test]
    fn test_severity_serde_format() {
        let json = serde_json::to_string(&BottleneckSeverity::CriticalBottleneck).unwrap();
        assert_eq!(json, "\"critical_bottleneck\"");
    }

    #[test]
    fn test_inventory_type_display() {
        assert_eq!(InventoryType::SafetyStock.to_string(), "safety_stock");
    }
}
