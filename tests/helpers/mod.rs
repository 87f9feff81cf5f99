// ==========================================
// 测试辅助函数
// ==========================================

// 各集成测试编译单元只使用其中一部分辅助函数
#![allow(dead_code)]

use vsm_analyzer::{Inventory, Process, ValueStreamState};

/// 创建测试用的工序
pub fn make_process(id: &str, name: &str, cycle_time: f64) -> Process {
    Process::new(id, name, cycle_time)
}

/// 创建测试用的价值流状态
pub fn make_state(
    daily_demand: f64,
    available_time: f64,
    processes: Vec<Process>,
) -> ValueStreamState {
    ValueStreamState {
        processes,
        inventories: Vec::new(),
        daily_demand,
        available_time,
    }
}

/// 创建测试用的库存缓冲
pub fn make_inventory(id: &str, quantity: f64) -> Inventory {
    Inventory::new(id, format!("库存-{}", id), quantity)
}

/// 浮点近似断言
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} got {}",
        expected,
        actual
    );
}
