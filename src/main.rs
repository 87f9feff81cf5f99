// ==========================================
// 价值流图分析系统 - 命令行入口
// ==========================================
// 职责: 外部协作方示例 — 从标准输入读取价值流状态 JSON,
//       输出全量分析报告 JSON
// 说明: I/O 只发生在这里, 核心库保持纯计算
// ==========================================

use anyhow::{Context, Result};
use std::io::Read;
use vsm_analyzer::{logging, AnalysisApi, ValueStreamState};

fn main() -> Result<()> {
    logging::init();

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("读取标准输入失败")?;

    let state: ValueStreamState =
        serde_json::from_str(&input).context("价值流状态 JSON 解析失败")?;

    let api = AnalysisApi::with_defaults();
    let report = api.full_report(&state).context("分析报告生成失败")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
