//! Drives the plugin through the same `vst::plugin::Plugin` surface a host uses.

use precision_poc::config::{Config, ProfilerConfig};
use precision_poc::dsp::oscillator::{DoubleOscillator, OscillatorConfig, SingleOscillator};
use precision_poc::lifecycle::Lifecycle;
use precision_poc::plugin_state::Precision;
use precision_poc::PrecisionPocVst;
use vst::api::Supported;
use vst::host::HostBuffer;
use vst::plugin::{CanDo, HostCallback, Plugin, PluginParameters};

fn plugin() -> PrecisionPocVst {
    let config = Config {
        profiler: ProfilerConfig {
            enabled: false,
            ..ProfilerConfig::default()
        },
        ..Config::default()
    };
    PrecisionPocVst::with_config(HostCallback::default(), &config)
}

#[test]
fn info_advertises_stereo_effect_with_double_precision() {
    let info = plugin().get_info();
    assert_eq!(info.inputs, 2);
    assert_eq!(info.outputs, 2);
    assert_eq!(info.presets, 1);
    assert_eq!(info.parameters, 0);
    assert!(info.f64_precision);
}

#[test]
fn unique_id_is_stable() {
    assert_eq!(plugin().get_info().unique_id, plugin().get_info().unique_id);
}

#[test]
fn resume_and_suspend_drive_the_lifecycle() {
    let mut plugin = plugin();
    assert_eq!(plugin.dsp().lifecycle(), Lifecycle::Uninitialized);

    plugin.set_sample_rate(48_000.);
    plugin.set_block_size(256);
    plugin.resume();
    assert_eq!(plugin.dsp().lifecycle(), Lifecycle::Prepared);
    let delta = plugin.dsp().double_oscillator().phase_delta();
    assert!((delta - std::f64::consts::TAU * 440. / 48_000.).abs() < 1e-15);

    plugin.suspend();
    assert_eq!(plugin.dsp().lifecycle(), Lifecycle::Released);
}

#[test]
fn nothing_is_rendered_before_the_host_processes() {
    let plugin = plugin();
    assert_eq!(plugin.state().precision(), Precision::Unknown);
}

#[test]
fn midi_is_refused() {
    let plugin = plugin();
    assert!(matches!(plugin.can_do(CanDo::ReceiveMidiEvent), Supported::No));
    assert!(matches!(plugin.can_do(CanDo::ReceiveEvents), Supported::No));
    assert!(matches!(plugin.can_do(CanDo::Bypass), Supported::Maybe));
}

#[test]
fn parameter_object_exposes_one_empty_program() {
    let mut plugin = plugin();
    let params = plugin.get_parameter_object();
    assert_eq!(params.get_preset_num(), 0);
    assert_eq!(params.get_preset_name(0), "");
    params.load_preset_data(b"ignored");
    assert!(params.get_preset_data().is_empty());
}

#[test]
fn editor_is_handed_out_once() {
    let mut plugin = plugin();
    assert!(plugin.get_editor().is_some());
    assert!(plugin.get_editor().is_none());
}

const BLOCK: usize = 64;
const SAMPLE_RATE: f32 = 44_100.;

fn resumed_plugin() -> PrecisionPocVst {
    let mut plugin = plugin();
    plugin.set_sample_rate(SAMPLE_RATE);
    plugin.set_block_size(BLOCK as i64);
    plugin.resume();
    plugin
}

#[test]
fn process_adds_the_tone_onto_the_input() {
    let mut plugin = resumed_plugin();
    let inputs = [[0.5f32; BLOCK]; 2];
    let mut outputs = [[9f32; BLOCK]; 2];
    let mut host_buffer = HostBuffer::<f32>::new(2, 2);
    let mut buffer = host_buffer.bind(&inputs, &mut outputs);
    plugin.process(&mut buffer);

    let mut reference = SingleOscillator::new(OscillatorConfig::SINGLE);
    reference.prepare(f64::from(SAMPLE_RATE));
    let mut expected = vec![vec![0.5f32; BLOCK]; 2];
    reference.render(&mut expected, 0, BLOCK);

    assert_eq!(outputs[0][0], 0.5);
    assert_eq!(&outputs[0][..], &expected[0][..]);
    assert_eq!(&outputs[1][..], &expected[1][..]);
    assert_eq!(plugin.state().precision(), Precision::Single);
}

#[test]
fn process_f64_renders_the_double_path() {
    let mut plugin = resumed_plugin();
    let inputs = [[0f64; BLOCK]; 2];
    let mut outputs = [[9f64; BLOCK]; 2];
    let mut host_buffer = HostBuffer::<f64>::new(2, 2);
    let mut buffer = host_buffer.bind(&inputs, &mut outputs);
    plugin.process_f64(&mut buffer);

    let mut reference = DoubleOscillator::new(OscillatorConfig::DOUBLE);
    reference.prepare(f64::from(SAMPLE_RATE));
    let mut expected = vec![vec![0f64; BLOCK]; 2];
    reference.render(&mut expected, 0, BLOCK);

    assert_eq!(&outputs[0][..], &expected[0][..]);
    assert_eq!(&outputs[1][..], &expected[1][..]);
    assert_eq!(plugin.state().precision(), Precision::Double);
}

#[test]
fn mismatched_channel_counts_are_skipped() {
    let mut plugin = resumed_plugin();
    let inputs = [[0.5f32; BLOCK]; 1];
    let mut outputs = [[9f32; BLOCK]; 2];
    let mut host_buffer = HostBuffer::<f32>::new(1, 2);
    let mut buffer = host_buffer.bind(&inputs, &mut outputs);
    plugin.process(&mut buffer);
    plugin.process(&mut buffer);

    assert!(outputs.iter().flatten().all(|s| *s == 9.));
    assert_eq!(plugin.state().precision(), Precision::Unknown);
}

#[test]
fn process_before_resume_leaves_output_untouched() {
    let mut plugin = plugin();
    let inputs = [[0.5f64; BLOCK]; 2];
    let mut outputs = [[0f64; BLOCK]; 2];
    let mut host_buffer = HostBuffer::<f64>::new(2, 2);
    let mut buffer = host_buffer.bind(&inputs, &mut outputs);
    plugin.process_f64(&mut buffer);

    assert!(outputs.iter().flatten().all(|s| *s == 0.));
    assert_eq!(plugin.state().precision(), Precision::Unknown);
    assert_eq!(plugin.dsp().double_oscillator().phase(), 0.);
}

#[test]
fn huge_block_size_does_not_prevent_resume() {
    let mut plugin = plugin();
    plugin.set_block_size(i64::MAX);
    plugin.resume();
    assert_eq!(plugin.dsp().lifecycle(), Lifecycle::Prepared);

    let inputs = [[0f32; BLOCK]; 2];
    let mut outputs = [[0f32; BLOCK]; 2];
    let mut host_buffer = HostBuffer::<f32>::new(2, 2);
    let mut buffer = host_buffer.bind(&inputs, &mut outputs);
    plugin.process(&mut buffer);
    assert_eq!(plugin.state().precision(), Precision::Single);
}
