//! Every model through the host backend: bind, submit, swap, drain, map.

use pfield_core::ConfigRecords;
use pfield_device::host::{self, HostPlatform};
use pfield_device::{compile_kernel, ComputeDevice, LaunchGeometry};
use pfield_models::{build_model, ModelBuffers, ModelKind};
use pfield_test_utils::fixtures::{
    CAHN_HILLIARD_KEYS, KERNEL_SOURCE, KOBAYASHI_ANISO_KEYS, KOBAYASHI_ISO_KEYS,
};
use pfield_test_utils::sim_config;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn keys(kind: ModelKind) -> &'static str {
    match kind {
        ModelKind::Diffusion => "DIFFUSION_COEFFICIENT = 1.0;",
        ModelKind::CahnHilliard => CAHN_HILLIARD_KEYS,
        ModelKind::KobayashiIso => KOBAYASHI_ISO_KEYS,
        ModelKind::KobayashiAniso => KOBAYASHI_ANISO_KEYS,
    }
}

#[test]
fn layouts_match_initial_fields() {
    let config = sim_config(16, 10, 1);
    for kind in ModelKind::ALL {
        let model = build_model(kind, &ConfigRecords::parse(keys(kind))).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let initial = model.initial_fields(&config, &mut rng);
        let layout = model.layout();
        let labels: Vec<&str> = initial.fields.iter().map(|f| f.label).collect();
        assert_eq!(labels, layout.fields, "{kind}");
        assert_eq!(initial.work.len(), layout.work_buffers, "{kind}");
        for f in &initial.fields {
            assert_eq!(f.a.size(), 16);
            assert_eq!(f.b.size(), 16);
        }
    }
}

#[test]
fn noise_only_for_dendritic_models() {
    for kind in ModelKind::ALL {
        let model = build_model(kind, &ConfigRecords::parse(keys(kind))).unwrap();
        let dendritic = matches!(kind, ModelKind::KobayashiIso | ModelKind::KobayashiAniso);
        assert_eq!(model.noise_schedule().is_some(), dendritic, "{kind}");
        assert_eq!(model.tag(), kind.tag());
    }
}

#[test]
fn one_iteration_on_the_host_backend() {
    let config = sim_config(16, 10, 1);
    for kind in ModelKind::ALL {
        let model = build_model(kind, &ConfigRecords::parse(keys(kind))).unwrap();
        let mut device = host::open(&HostPlatform::enumerate(), 0, 0, model.host_kernel()).unwrap();
        let kernel = compile_kernel(&mut device, KERNEL_SOURCE, &model.defines(&config)).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let initial = model.initial_fields(&config, &mut rng);
        let mut buffers = ModelBuffers::upload(initial, &mut device).unwrap();

        for _ in 0..2 {
            let args = model.bind_half_step(&mut buffers, 0.1).unwrap();
            device
                .submit(kernel, &args, LaunchGeometry::square(16, 4))
                .unwrap();
            buffers.swap_all();
        }
        let token = device.drain().unwrap();

        assert!(buffers.pairs().iter().all(|p| p.half_steps() == 2), "{kind}");
        for index in 0..buffers.labels().len() {
            let grid = buffers.map_field(index, &mut device, &token).unwrap();
            assert!(
                grid.as_slice().iter().all(|v| v.is_finite()),
                "{kind} field {index}"
            );
        }
    }
}
