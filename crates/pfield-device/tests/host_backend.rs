//! Integration tests for the host compute backend.

use std::sync::Arc;

use pfield_device::host::{self, ArgAccess, HostKernel, HostKernelFactory, HostPlatform, KernelIo};
use pfield_device::{
    compile_kernel, ComputeDevice, DeviceError, KernelArg, KernelDefines, LaunchGeometry,
};

const SOURCE: &str = "__kernel void phase_field_evol_kern(__global const float* in,\n\
                      __global float* out, const float s) {}";

/// `out = in * SCALE + s`.
struct Affine {
    scale: f32,
}

impl HostKernel for Affine {
    fn signature(&self) -> &[ArgAccess] {
        &[ArgAccess::Read, ArgAccess::Write, ArgAccess::Scalar]
    }

    fn execute(&mut self, io: &mut KernelIo<'_>) -> Result<(), String> {
        let input = io.read(0)?;
        let s = io.scalar(2)?;
        let out = io.take_write(1)?;
        for (o, i) in out.iter_mut().zip(input) {
            *o = i * self.scale + s;
        }
        Ok(())
    }
}

/// Fails on every launch.
struct Broken;

impl HostKernel for Broken {
    fn signature(&self) -> &[ArgAccess] {
        &[ArgAccess::Read, ArgAccess::Write, ArgAccess::Scalar]
    }

    fn execute(&mut self, _io: &mut KernelIo<'_>) -> Result<(), String> {
        Err("NaN detected".into())
    }
}

fn affine_factory() -> Arc<dyn HostKernelFactory> {
    Arc::new(|d: &KernelDefines| -> Result<Box<dyn HostKernel>, String> {
        Ok(Box::new(Affine {
            scale: d.get_f32("SCALE")?,
        }))
    })
}

fn open_affine() -> host::HostDevice {
    host::open(&HostPlatform::enumerate(), 0, 0, affine_factory()).unwrap()
}

#[test]
fn launch_drain_read_back() {
    let mut dev = open_affine();
    let k = compile_kernel(&mut dev, SOURCE, &KernelDefines::new().float("SCALE", 2.0)).unwrap();
    let a = dev.create_buffer(&[1.0; 16]).unwrap();
    let b = dev.create_buffer(&[0.0; 16]).unwrap();

    let ev = dev
        .submit(
            k,
            &[KernelArg::Buffer(a), KernelArg::Buffer(b), KernelArg::Scalar(0.5)],
            LaunchGeometry::square(4, 2),
        )
        .unwrap();
    let token = dev.drain().unwrap();
    let mut out = vec![0.0; 16];
    dev.read_back(b, &token, &mut out).unwrap();
    assert!(out.iter().all(|&v| v == 2.5));

    let timing = dev.profile(&ev).unwrap();
    assert!(timing.end_ns >= timing.start_ns);
}

#[test]
fn stale_token_is_rejected() {
    let mut dev = open_affine();
    let k = compile_kernel(&mut dev, SOURCE, &KernelDefines::new().float("SCALE", 1.0)).unwrap();
    let a = dev.create_buffer(&[1.0; 4]).unwrap();
    let b = dev.create_buffer(&[0.0; 4]).unwrap();
    let args = [KernelArg::Buffer(a), KernelArg::Buffer(b), KernelArg::Scalar(0.0)];
    let geometry = LaunchGeometry::square(2, 1);

    let stale = dev.drain().unwrap();
    dev.submit(k, &args, geometry).unwrap();
    let mut out = vec![0.0; 4];
    assert!(matches!(
        dev.read_back(b, &stale, &mut out),
        Err(DeviceError::NotDrained { .. })
    ));
    let fresh = dev.drain().unwrap();
    dev.read_back(b, &fresh, &mut out).unwrap();
    assert_eq!(out, vec![1.0; 4]);
}

#[test]
fn aliased_write_is_rejected() {
    let mut dev = open_affine();
    let k = compile_kernel(&mut dev, SOURCE, &KernelDefines::new().float("SCALE", 1.0)).unwrap();
    let a = dev.create_buffer(&[1.0; 4]).unwrap();
    let err = dev
        .submit(
            k,
            &[KernelArg::Buffer(a), KernelArg::Buffer(a), KernelArg::Scalar(0.0)],
            LaunchGeometry::square(2, 1),
        )
        .unwrap_err();
    assert_eq!(err, DeviceError::AliasedBuffer { buffer: a });
}

#[test]
fn geometry_and_arity_are_checked() {
    let mut dev = open_affine();
    let k = compile_kernel(&mut dev, SOURCE, &KernelDefines::new().float("SCALE", 1.0)).unwrap();
    let a = dev.create_buffer(&[1.0; 36]).unwrap();
    let b = dev.create_buffer(&[0.0; 36]).unwrap();
    let args = [KernelArg::Buffer(a), KernelArg::Buffer(b), KernelArg::Scalar(0.0)];

    assert!(matches!(
        dev.submit(k, &args, LaunchGeometry::square(6, 4)),
        Err(DeviceError::InvalidGeometry { .. })
    ));
    assert!(matches!(
        dev.submit(k, &args[..2], LaunchGeometry::square(6, 2)),
        Err(DeviceError::ArgumentMismatch { .. })
    ));
    assert!(matches!(
        dev.submit(k, &args, LaunchGeometry::square(4, 2)),
        Err(DeviceError::BufferLength { .. })
    ));
}

#[test]
fn work_group_above_device_limit_is_rejected() {
    let platform = HostPlatform::with_limits(1, 16);
    let mut dev = platform.open_device(0, affine_factory()).unwrap();
    let k = compile_kernel(&mut dev, SOURCE, &KernelDefines::new().float("SCALE", 1.0)).unwrap();
    let a = dev.create_buffer(&[1.0; 64]).unwrap();
    let b = dev.create_buffer(&[0.0; 64]).unwrap();
    let args = [KernelArg::Buffer(a), KernelArg::Buffer(b), KernelArg::Scalar(0.0)];
    assert!(dev.submit(k, &args, LaunchGeometry::square(8, 4)).is_ok());
    assert!(matches!(
        dev.submit(k, &args, LaunchGeometry::square(8, 8)),
        Err(DeviceError::InvalidGeometry { .. })
    ));
}

#[test]
fn missing_define_fails_build_naming_identifier() {
    let mut dev = open_affine();
    let err = compile_kernel(&mut dev, SOURCE, &KernelDefines::new().int("SIZE", 4)).unwrap_err();
    match err {
        DeviceError::BuildFailed { log } => assert!(log.contains("'SCALE'")),
        other => panic!("expected build failure, got {other:?}"),
    }
}

#[test]
fn missing_entry_point_fails_build() {
    let mut dev = open_affine();
    let err = dev
        .compile("__kernel void other() {}", "-DSCALE=1.0")
        .unwrap_err();
    assert!(matches!(err, DeviceError::BuildFailed { .. }));
}

#[test]
fn kernel_failure_surfaces_at_drain() {
    let factory: Arc<dyn HostKernelFactory> =
        Arc::new(|_: &KernelDefines| -> Result<Box<dyn HostKernel>, String> { Ok(Box::new(Broken)) });
    let mut dev = host::open(&HostPlatform::enumerate(), 0, 0, factory).unwrap();
    let k = dev.compile(SOURCE, "").unwrap();
    let a = dev.create_buffer(&[1.0; 4]).unwrap();
    let b = dev.create_buffer(&[0.0; 4]).unwrap();
    let args = [KernelArg::Buffer(a), KernelArg::Buffer(b), KernelArg::Scalar(0.0)];
    let ev = dev.submit(k, &args, LaunchGeometry::square(2, 1)).unwrap();
    assert!(matches!(dev.drain(), Err(DeviceError::KernelFailed { .. })));
    assert!(matches!(
        dev.profile(&ev),
        Err(DeviceError::ProfilingUnavailable { .. })
    ));
    // The failure is reported once.
    assert!(dev.drain().is_ok());
}

#[test]
fn out_of_range_selection() {
    let platforms = HostPlatform::enumerate();
    assert!(matches!(
        host::open(&platforms, 1, 0, affine_factory()),
        Err(DeviceError::NoSuchPlatform { index: 1, available: 1 })
    ));
    assert!(matches!(
        host::open(&platforms, 0, 2, affine_factory()),
        Err(DeviceError::NoSuchDevice { platform: 0, index: 2, available: 1 })
    ));
}
