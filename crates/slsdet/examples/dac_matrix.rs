//! DAC 矩阵示例
//!
//! 在模拟的 4 模块 Mythen3 探测器上：修改阈值、导出矩阵、
//! 从矩阵写回并恢复默认值。
//!
//! ```bash
//! RUST_LOG=slsdet_dacs=debug cargo run -p slsdet --example dac_matrix
//! ```

use slsdet::prelude::*;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    slsdet::init_logger("slsdet=info")?;

    let det = Arc::new(MockDetector::with_defaults(4, &mythen3_dacs()));
    let dacs = DetectorDacs::mythen3(Arc::clone(&det))?;

    dacs.set("vth1", 1500)?;
    dacs.set("vth2", [2700, 2750, 2800, 2850])?;
    println!("{}", dacs.render()?);

    let mut m = dacs.to_matrix()?;
    println!("matrix {}x{}", m.nrows(), m.ncols());

    // 所有模块的 vcas 提高 10
    if let Some(row) = dacs.names().position(|n| n == "vcas") {
        m.row_mut(row).iter_mut().for_each(|v| *v += 10);
    }
    dacs.from_matrix(&m)?;
    println!("vcas = {:?}", dacs.get("vcas")?.get()?);

    let vth1 = dacs.get("vth1")?;
    println!("vth1 = {:?} mV", vth1.get_mv()?);

    dacs.reset_all_to_default()?;
    println!("{}", dacs.render()?);
    Ok(())
}
