//! DAC 集合集成测试
//!
//! 通过模拟探测器验证集合的读写、矩阵导入导出、批量恢复默认值
//! 以及部分失败时的状态。

mod common;

use common::{mythen3, rows, setup, threshold_descriptors};
use slsdet::prelude::*;
use slsdet::{HandleError, Mythen3Dac};
use slsdet::dacs::DACS_HEADER;
use std::sync::Arc;

#[test]
fn test_threshold_example() {
    let (_det, dacs) = setup(threshold_descriptors(), 3);

    dacs.set("vth1", 1500).unwrap();
    let m = dacs.to_matrix().unwrap();

    assert_eq!(rows(&m), vec![vec![1500, 1500, 1500], vec![1000, 1000, 1000]]);
}

#[test]
fn test_unknown_name_is_hard_error() {
    let (det, dacs) = setup(threshold_descriptors(), 2);
    det.reset_counters();

    let err = dacs.set("vth3", 100).unwrap_err();
    assert!(matches!(err, DacError::UnknownDac(ref name) if name == "vth3"));
    assert_eq!(err.to_string(), "Dac not found: vth3");
    assert_eq!(det.write_calls(), 0);
}

#[test]
fn test_out_of_range_values_are_written() {
    let (_det, dacs) = setup(threshold_descriptors(), 2);
    dacs.set("vth1", [-100, 99_999]).unwrap();
    assert_eq!(dacs.get("vth1").unwrap().get().unwrap(), vec![-100, 99_999]);
}

#[test]
fn test_mythen3_reset_all() {
    let (det, dacs) = mythen3(4);
    for dac in &dacs {
        dac.set(0).unwrap();
    }

    det.reset_counters();
    dacs.reset_all_to_default().unwrap();
    assert_eq!(det.write_calls(), 16);

    for dac in &dacs {
        let expected = Mythen3Dac::from_name(dac.name()).unwrap().default_value();
        assert_eq!(dac.get().unwrap(), vec![expected; 4], "dac {}", dac.name());
    }
}

#[test]
fn test_matrix_shape_and_order() {
    let (_det, dacs) = mythen3(3);
    let m = dacs.to_matrix().unwrap();
    assert_eq!(m.shape(), (16, 3));

    for (i, name) in dacs.names().enumerate() {
        let default = Mythen3Dac::from_name(name).unwrap().default_value();
        assert!(m.row(i).iter().all(|&v| v == default));
    }
}

#[test]
fn test_from_matrix_then_to_matrix() {
    let (_det, dacs) = mythen3(2);
    let values: Vec<i32> = (0..32).map(|v| v * 100).collect();
    let m = DacMatrix::from_row_slice(16, 2, &values);

    dacs.from_matrix(&m).unwrap();
    assert_eq!(dacs.to_matrix().unwrap(), m);
    assert_eq!(dacs.get("vdcsh").unwrap().get().unwrap(), vec![3000, 3100]);
}

#[test]
fn test_from_matrix_wrong_rows_writes_nothing() {
    let (det, dacs) = mythen3(2);
    det.reset_counters();

    let m = DacMatrix::from_row_slice(15, 2, &[0; 30]);
    assert!(matches!(
        dacs.from_matrix(&m),
        Err(DacError::ShapeMismatch {
            expected: 16,
            actual: 15,
            ..
        })
    ));
    assert_eq!(det.write_calls(), 0);
}

#[test]
fn test_from_matrix_communication_failure_is_partial() {
    let (det, dacs) = setup(threshold_descriptors(), 2);
    // 每行逐模块写入：第 0 行两次写入成功，第 1 行第一次写入失败
    det.fail_after_writes(Some(2));

    let m = DacMatrix::from_row_slice(2, 2, &[11, 12, 21, 22]);
    assert!(matches!(
        dacs.from_matrix(&m),
        Err(DacError::Communication(HandleError::Timeout))
    ));

    det.fail_after_writes(None);
    assert_eq!(rows(&dacs.to_matrix().unwrap()), vec![vec![11, 12], vec![1000, 1000]]);
}

#[test]
fn test_read_failure_is_all_or_nothing() {
    let (det, dacs) = setup(threshold_descriptors(), 3);
    det.fail_module(Some(2));

    let err = dacs.to_matrix().unwrap_err();
    match err {
        DacError::Communication(e) => assert_eq!(e.failed_module(), Some(2)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_module_selection() {
    let (_det, dacs) = setup(threshold_descriptors(), 4);
    let vth2 = dacs.get("vth2").unwrap();

    vth2.set_modules(&ModuleSelector::from(vec![0, 3]), 7).unwrap();
    assert_eq!(vth2.get().unwrap(), vec![7, 1000, 1000, 7]);

    let err = vth2.get_modules(&ModuleSelector::module(4)).unwrap_err();
    assert!(matches!(
        err,
        DacError::ModuleOutOfRange {
            module: 4,
            count: 4
        }
    ));
}

#[test]
fn test_module_count_tracks_handle() {
    let (det, dacs) = setup(threshold_descriptors(), 2);
    assert_eq!(dacs.to_matrix().unwrap().ncols(), 2);

    det.set_module_count(5);
    assert_eq!(dacs.module_count(), 5);
    assert_eq!(dacs.to_matrix().unwrap().shape(), (2, 5));
}

#[test]
fn test_millivolt_access() {
    let (det, dacs) = mythen3(1);
    let vth1 = dacs.get("vth1").unwrap();

    vth1.set_mv(2048).unwrap();
    assert_eq!(det.values(Mythen3Dac::Vth1.register()), vec![4095]);
    assert_eq!(vth1.get_mv().unwrap(), vec![2048]);

    // 超出换算范围由会话拒绝
    assert!(matches!(
        vth1.set_mv(3000),
        Err(DacError::Communication(HandleError::Protocol(_)))
    ));
}

#[test]
fn test_render_block() {
    let (_det, dacs) = setup(threshold_descriptors(), 3);
    dacs.set("vth2", [1, 22, 333]).unwrap();

    let expected = format!(
        "{DACS_HEADER}\nvth1           : 1200 1200 1200\nvth2           :    1   22  333"
    );
    assert_eq!(dacs.render().unwrap(), expected);
}

#[test]
fn test_dyn_handle_collection() {
    let det: Arc<dyn DetectorHandle> = Arc::new(MockDetector::new(2));
    let dacs = DetectorDacs::new(threshold_descriptors(), det).unwrap();
    dacs.reset_all_to_default().unwrap();
    assert_eq!(rows(&dacs.to_matrix().unwrap()), vec![vec![1200, 1200], vec![1000, 1000]]);
}

#[test]
fn test_config_file_collection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mythen3.toml");
    DacTableConfig::mythen3().save_to_file(&path).unwrap();

    let config = DacTableConfig::load_from_file(&path).unwrap();
    let det = Arc::new(MockDetector::new(2));
    let dacs = DetectorDacs::from_config(&config, det).unwrap();

    let names: Vec<_> = dacs.names().collect();
    let expected: Vec<_> = Mythen3Dac::ALL.iter().map(|d| d.name()).collect();
    assert_eq!(names, expected);
}

#[test]
fn test_empty_config_rejected() {
    let config = DacTableConfig::new(Vec::new());
    let det = Arc::new(MockDetector::new(1));
    assert!(matches!(
        DetectorDacs::from_config(&config, det),
        Err(DacError::Config(slsdet::ConfigError::Empty))
    ));
}

#[test]
fn test_other_per_module_property() {
    use std::sync::Mutex;

    // 与 DAC 无关的按模块参数（例如阈值能量），同样走属性访问器
    let energies = Mutex::new(vec![4000, 4000, 4000]);
    let prop = DetectorProperty::from_fns(
        "threshold",
        |modules| {
            let e = energies.lock().unwrap();
            Ok(modules.iter().map(|&m| e[m]).collect())
        },
        |value, modules| {
            let mut e = energies.lock().unwrap();
            for &m in modules {
                e[m] = value;
            }
            Ok(())
        },
        || 3,
    );

    prop.write(&ModuleSelector::All, [4500, 5000, 5500]).unwrap();
    assert_eq!(prop.read(&ModuleSelector::All).unwrap(), vec![4500, 5000, 5500]);
    assert!(matches!(
        prop.write(&ModuleSelector::All, vec![1]),
        Err(DacError::ShapeMismatch { .. })
    ));
    assert_eq!(
        prop.render(&ModuleSelector::module(1)).unwrap(),
        "threshold      : 5000"
    );
}

#[test]
fn test_register_missing_on_detector() {
    // 探测器只登记了阈值寄存器 0 和 1，Mythen3 的 vth1 是寄存器 6
    let det = Arc::new(MockDetector::with_defaults(2, &threshold_descriptors()));
    let dacs = DetectorDacs::mythen3(det).unwrap();

    let err = dacs.get("vth1").unwrap().get().unwrap_err();
    assert!(matches!(
        err,
        DacError::Communication(HandleError::Protocol(slsdet::ProtocolError::UnknownRegister(6)))
    ));
    assert!(dacs.get("vcassh").unwrap().get().is_ok());
}
