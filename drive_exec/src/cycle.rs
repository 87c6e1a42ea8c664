//! # Drive cycle
//!
//! One pass of the control pipeline, independent of timing and of where the operator commands
//! come from:
//!
//! 1. Clear per-cycle data and perform any pending encoder reset
//! 2. Execute the operator commands
//! 3. Freeze the drive mode for the cycle
//! 4. InputShaper, DriveCtrl, then motor demands (or stop in safe mode)
//! 5. Encoder read, then Odometry
//! 6. Publish telemetry

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace, warn};

// Internal
use comms_if::{
    eqpt::drive::WheelId,
    tc::Tc,
    tm::TmFrame,
};
use util::module::State;

use crate::{
    data_store::{DataStore, SafeModeCause},
    drive_ctrl,
    ports::{EncoderFeedback, MotorOutput, TelemetrySink},
    tc_processor,
};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Run a single drive cycle, returning the telemetry frame published for it.
///
/// Collaborator failures never abort the cycle. A failed motor output puts the drivetrain into
/// safe mode until the motors accept a command again.
pub fn step<M, E>(
    ds: &mut DataStore,
    tcs: &[Tc],
    motors: &mut M,
    encoders: &mut E,
    tm_sinks: &mut [Box<dyn TelemetrySink>],
    cycle_time_s: f64,
) -> TmFrame
where
    M: MotorOutput,
    E: EncoderFeedback,
{
    ds.cycle_start(cycle_time_s);

    if ds.encoder_reset_pending {
        match encoders.reset() {
            Ok(()) => {
                info!("Encoders reset");
                ds.encoder_reset_pending = false;
            }
            Err(e) => warn!("Could not reset the encoders, will retry: {}", e),
        }
    }

    // ---- TELECOMMAND PROCESSING ----

    for tc in tcs {
        tc_processor::exec(ds, tc);
    }

    ds.drive_mode = ds.mode_ctrl.current_mode();

    // ---- CONTROL ALGORITHM PROCESSING ----

    let (shaped, rpt) = match ds.input_shaper.proc(&ds.axes) {
        Ok(o) => o,
        Err(e) => match e {},
    };
    ds.shaped_input = shaped;
    ds.input_shaper_status_rpt = rpt;

    let drive_input = drive_ctrl::InputData {
        mode: ds.drive_mode,
        shaped: ds.shaped_input,
    };
    let (dems, rpt) = match ds.drive_ctrl.proc(&drive_input) {
        Ok(o) => o,
        Err(e) => match e {},
    };
    ds.motor_dems = dems;
    ds.drive_ctrl_status_rpt = rpt;

    if rpt.left_saturated || rpt.right_saturated {
        trace!("Motor demands saturated: {:?}", rpt);
    }

    // ---- MOTOR OUTPUT ----

    let output_result = if ds.safe {
        motors.stop()
    } else {
        motors.set_demands(ds.motor_dems)
    };

    match output_result {
        Ok(()) => {
            ds.make_unsafe(SafeModeCause::MotorOutputFailure).ok();
        }
        Err(e) => {
            warn!("Motor output failed: {}", e);
            ds.make_safe(SafeModeCause::MotorOutputFailure);
        }
    }

    // ---- ODOMETRY ----

    match encoders.read() {
        Ok(d) => ds.encoder_sens_data = d,
        Err(e) => warn!("Could not read the encoders, using the previous reading: {}", e),
    }

    let (odom, _) = match ds.odometry.proc(&ds.encoder_sens_data) {
        Ok(o) => o,
        Err(e) => match e {},
    };
    ds.drive_odom = odom;

    // ---- TELEMETRY ----

    let frame = build_tm_frame(ds);

    for sink in tm_sinks.iter_mut() {
        if let Err(e) = sink.publish(&frame) {
            warn!("Could not publish telemetry: {}", e);
        }
    }

    ds.num_cycles += 1;

    frame
}

/// Build the telemetry frame for the current cycle.
pub fn build_tm_frame(ds: &DataStore) -> TmFrame {
    let odom = &ds.drive_odom;
    let fl = odom.wheel(WheelId::FrontLeft);
    let bl = odom.wheel(WheelId::BackLeft);
    let fr = odom.wheel(WheelId::FrontRight);
    let br = odom.wheel(WheelId::BackRight);

    TmFrame {
        time_s: ds.cycle_time_s,
        cycle: ds.num_cycles,
        safe: ds.safe,
        drive_mode: ds.drive_mode,
        left_speed: ds.motor_dems.left,
        right_speed: ds.motor_dems.right,
        left_position: odom.left.position,
        right_position: odom.right.position,
        left_rate: odom.left.rate,
        right_rate: odom.right.rate,
        front_left_position: fl.position,
        front_left_rate: fl.rate,
        back_left_position: bl.position,
        back_left_rate: bl.rate,
        front_right_position: fr.position,
        front_right_rate: fr.rate,
        back_right_position: br.position,
        back_right_rate: br.rate,
        left_y_suppressed: ds.input_shaper_status_rpt.left_y_suppressed,
        right_y_suppressed: ds.input_shaper_status_rpt.right_y_suppressed,
        right_x_suppressed: ds.input_shaper_status_rpt.right_x_suppressed,
        left_saturated: ds.drive_ctrl_status_rpt.left_saturated,
        right_saturated: ds.drive_ctrl_status_rpt.right_saturated,
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    use comms_if::{
        eqpt::drive::{
            DriveMode, EncoderPulseReading, EncoderSensData, MotorCommandPair, MotorConfig,
        },
        tc::ControllerAxes,
    };

    use crate::{
        input_shaper::{self, InputShaper},
        mode_ctrl::ModeCtrl,
        odometry::{self, Odometry},
        sim_drive::{SimDrivetrain, SimParams},
        tm_sink::TmSinkError,
    };

    const EPS: f64 = 1e-9;

    #[derive(Debug, thiserror::Error)]
    #[error("bus fault")]
    struct BusFault;

    #[derive(Default)]
    struct RecordingMotors {
        demands: Vec<MotorCommandPair>,
        stops: usize,
        fail: bool,
    }

    impl MotorOutput for RecordingMotors {
        type Error = BusFault;

        fn configure(&mut self, _config: &MotorConfig) -> Result<(), Self::Error> {
            Ok(())
        }

        fn set_demands(&mut self, dems: MotorCommandPair) -> Result<(), Self::Error> {
            if self.fail {
                return Err(BusFault);
            }
            self.demands.push(dems);
            Ok(())
        }

        fn stop(&mut self) -> Result<(), Self::Error> {
            if self.fail {
                return Err(BusFault);
            }
            self.stops += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct FixedEncoders {
        data: EncoderSensData,
        resets: usize,
    }

    impl EncoderFeedback for FixedEncoders {
        type Error = BusFault;

        fn read(&mut self) -> Result<EncoderSensData, Self::Error> {
            Ok(self.data)
        }

        fn reset(&mut self) -> Result<(), Self::Error> {
            self.resets += 1;
            self.data = EncoderSensData::default();
            Ok(())
        }
    }

    struct RecordingSink(Rc<RefCell<Vec<TmFrame>>>);

    impl TelemetrySink for RecordingSink {
        fn publish(&mut self, frame: &TmFrame) -> Result<(), TmSinkError> {
            self.0.borrow_mut().push(*frame);
            Ok(())
        }
    }

    /// Data store with a unit distance per pulse.
    fn data_store(mode: DriveMode) -> DataStore {
        DataStore {
            mode_ctrl: ModeCtrl::new(mode),
            input_shaper: InputShaper::from_params(&input_shaper::Params::default()).unwrap(),
            odometry: Odometry::from_params(&odometry::Params {
                wheel_diameter: 1.0 / std::f64::consts::PI,
                pulses_per_revolution: 1.0,
                gear_ratio: 1.0,
            })
            .unwrap(),
            ..Default::default()
        }
    }

    fn no_sinks() -> Vec<Box<dyn TelemetrySink>> {
        Vec::new()
    }

    #[test]
    fn test_tank_cycle() {
        let mut ds = data_store(DriveMode::Tank);
        let mut motors = RecordingMotors::default();
        let mut encoders = FixedEncoders::default();
        let frames = Rc::new(RefCell::new(Vec::new()));
        let mut sinks: Vec<Box<dyn TelemetrySink>> =
            vec![Box::new(RecordingSink(frames.clone()))];

        let frame = step(
            &mut ds,
            &[Tc::Axes(ControllerAxes::new(-0.55, -1.0, 0.3))],
            &mut motors,
            &mut encoders,
            &mut sinks,
            0.0,
        );

        assert_eq!(motors.demands.len(), 1);
        assert!((motors.demands[0].left - 0.5).abs() < EPS);
        assert_eq!(motors.demands[0].right, 1.0);

        assert_eq!(frame.drive_mode, DriveMode::Tank);
        assert_eq!(frame.cycle, 0);
        assert!(!frame.safe);
        assert!((frame.left_speed - 0.5).abs() < EPS);
        assert_eq!(ds.num_cycles, 1);

        assert_eq!(frames.borrow().len(), 1);
        assert_eq!(frames.borrow()[0], frame);
    }

    #[test]
    fn test_status_flags_in_frame() {
        let mut ds = data_store(DriveMode::Arcade);
        let mut motors = RecordingMotors::default();
        let mut encoders = FixedEncoders::default();

        // Left Y drives forwards, right Y sits in the deadband, full turn saturates the left side
        let tcs = [Tc::Axes(ControllerAxes::new(-0.55, 0.05, 1.0))];
        let frame = step(&mut ds, &tcs, &mut motors, &mut encoders, &mut no_sinks(), 0.0);

        assert!(!frame.left_y_suppressed);
        assert!(frame.right_y_suppressed);
        assert!(!frame.right_x_suppressed);
        assert!(frame.left_saturated);
        assert!(!frame.right_saturated);
        assert_eq!(motors.demands[0].left, 1.0);
        assert!((motors.demands[0].right + 0.5).abs() < EPS);
    }

    #[test]
    fn test_axes_held_between_cycles() {
        let mut ds = data_store(DriveMode::Tank);
        let mut motors = RecordingMotors::default();
        let mut encoders = FixedEncoders::default();

        let tcs = [Tc::Axes(ControllerAxes::new(-1.0, 1.0, 0.0))];
        step(&mut ds, &tcs, &mut motors, &mut encoders, &mut no_sinks(), 0.0);
        step(&mut ds, &[], &mut motors, &mut encoders, &mut no_sinks(), 0.02);

        assert_eq!(motors.demands[1], MotorCommandPair::new(1.0, -1.0));
    }

    #[test]
    fn test_toggle_never_changes_emitted_pair() {
        let mut ds = data_store(DriveMode::Tank);
        let mut motors = RecordingMotors::default();
        let mut encoders = FixedEncoders::default();

        // Tank reads both Y axes, arcade reads left Y and right X
        let tcs = [Tc::Axes(ControllerAxes::new(-1.0, 0.0, 1.0))];
        let frame = step(&mut ds, &tcs, &mut motors, &mut encoders, &mut no_sinks(), 0.0);
        let emitted = motors.demands[0];
        assert_eq!(emitted, MotorCommandPair::new(1.0, 0.0));

        // Toggle after the cycle has emitted its pair
        tc_processor::exec(&mut ds, &Tc::ToggleDriveMode);

        assert_eq!(motors.demands[0], emitted);
        assert_eq!(frame.left_speed, emitted.left);
        assert_eq!(frame.right_speed, emitted.right);
        assert_eq!(ds.drive_mode, DriveMode::Tank);

        // The next cycle picks the new mode up
        let frame = step(&mut ds, &[], &mut motors, &mut encoders, &mut no_sinks(), 0.02);
        assert_eq!(frame.drive_mode, DriveMode::Arcade);
        assert_eq!(motors.demands[1], MotorCommandPair::new(1.0, 0.0));
        assert_eq!(motors.demands[0], emitted);

        // Pure turn differs between modes
        let tcs = [Tc::Axes(ControllerAxes::new(0.0, 0.0, 1.0))];
        step(&mut ds, &tcs, &mut motors, &mut encoders, &mut no_sinks(), 0.04);
        assert_eq!(motors.demands[2], MotorCommandPair::new(1.0, -1.0));
    }

    #[test]
    fn test_toggle_tc_applies_before_mode_read() {
        let mut ds = data_store(DriveMode::Tank);
        let mut motors = RecordingMotors::default();
        let mut encoders = FixedEncoders::default();

        let tcs = [
            Tc::ToggleDriveMode,
            Tc::Axes(ControllerAxes::new(0.0, 0.0, -1.0)),
        ];
        let frame = step(&mut ds, &tcs, &mut motors, &mut encoders, &mut no_sinks(), 0.0);

        assert_eq!(frame.drive_mode, DriveMode::Arcade);
        assert_eq!(motors.demands[0], MotorCommandPair::new(-1.0, 1.0));
    }

    #[test]
    fn test_safe_mode_stops_motors() {
        let mut ds = data_store(DriveMode::Tank);
        let mut motors = RecordingMotors::default();
        let mut encoders = FixedEncoders::default();

        let tcs = [Tc::Axes(ControllerAxes::new(-1.0, -1.0, 0.0)), Tc::MakeSafe];
        let frame = step(&mut ds, &tcs, &mut motors, &mut encoders, &mut no_sinks(), 0.0);

        assert!(motors.demands.is_empty());
        assert_eq!(motors.stops, 1);
        assert!(frame.safe);
        assert_eq!(frame.left_speed, 0.0);
        assert_eq!(frame.right_speed, 0.0);

        step(&mut ds, &[Tc::MakeUnsafe], &mut motors, &mut encoders, &mut no_sinks(), 0.02);
        assert_eq!(motors.demands, vec![MotorCommandPair::new(1.0, 1.0)]);
    }

    #[test]
    fn test_motor_failure_enters_safe_mode() {
        let mut ds = data_store(DriveMode::Tank);
        let mut motors = RecordingMotors { fail: true, ..Default::default() };
        let mut encoders = FixedEncoders::default();

        let tcs = [Tc::Axes(ControllerAxes::new(-1.0, -1.0, 0.0))];
        step(&mut ds, &tcs, &mut motors, &mut encoders, &mut no_sinks(), 0.0);
        assert!(ds.safe);
        assert!(ds.safe_causes.contains(&SafeModeCause::MotorOutputFailure));

        // The motors recover, the stop succeeds and safe mode is cleared
        motors.fail = false;
        step(&mut ds, &[], &mut motors, &mut encoders, &mut no_sinks(), 0.02);
        assert_eq!(motors.stops, 1);
        assert!(!ds.safe);

        step(&mut ds, &[], &mut motors, &mut encoders, &mut no_sinks(), 0.04);
        assert_eq!(motors.demands, vec![MotorCommandPair::new(1.0, 1.0)]);
    }

    #[test]
    fn test_operator_safe_not_cleared_by_motor_recovery() {
        let mut ds = data_store(DriveMode::Tank);
        let mut motors = RecordingMotors::default();
        let mut encoders = FixedEncoders::default();

        step(&mut ds, &[Tc::MakeSafe], &mut motors, &mut encoders, &mut no_sinks(), 0.0);
        step(&mut ds, &[], &mut motors, &mut encoders, &mut no_sinks(), 0.02);

        assert!(ds.safe);
        assert_eq!(motors.stops, 2);
    }

    #[test]
    fn test_operator_safe_held_through_motor_recovery() {
        let mut ds = data_store(DriveMode::Tank);
        let mut motors = RecordingMotors { fail: true, ..Default::default() };
        let mut encoders = FixedEncoders::default();

        let tcs = [Tc::Axes(ControllerAxes::new(-1.0, -1.0, 0.0))];
        step(&mut ds, &tcs, &mut motors, &mut encoders, &mut no_sinks(), 0.0);
        assert!(ds.safe);

        // Operator makes safe while the motor failure is active, then the motors recover
        motors.fail = false;
        step(&mut ds, &[Tc::MakeSafe], &mut motors, &mut encoders, &mut no_sinks(), 0.02);
        let frame = step(&mut ds, &[], &mut motors, &mut encoders, &mut no_sinks(), 0.04);

        assert!(ds.safe);
        assert!(frame.safe);
        assert!(ds.safe_causes.contains(&SafeModeCause::MakeSafeTc));
        assert!(!ds.safe_causes.contains(&SafeModeCause::MotorOutputFailure));
        assert!(motors.demands.is_empty());
        assert_eq!(motors.stops, 2);

        // Only the operator can release it
        step(&mut ds, &[Tc::MakeUnsafe], &mut motors, &mut encoders, &mut no_sinks(), 0.06);
        assert!(!ds.safe);
        assert_eq!(motors.demands, vec![MotorCommandPair::new(1.0, 1.0)]);
    }

    #[test]
    fn test_encoder_reset_at_next_cycle_start() {
        let mut ds = data_store(DriveMode::Tank);
        let mut motors = RecordingMotors::default();
        let mut encoders = FixedEncoders {
            data: EncoderSensData {
                front_left: EncoderPulseReading::new(10, 2.0),
                back_left: EncoderPulseReading::new(12, 2.0),
                front_right: EncoderPulseReading::new(20, 0.0),
                back_right: EncoderPulseReading::new(20, 0.0),
            },
            resets: 0,
        };

        let frame = step(
            &mut ds, &[Tc::ResetEncoders], &mut motors, &mut encoders, &mut no_sinks(), 0.0
        );

        // Not yet reset, this cycle still reports the old counts
        assert_eq!(encoders.resets, 0);
        assert!(ds.encoder_reset_pending);
        assert!((frame.left_position - 11.0).abs() < EPS);
        assert!((frame.left_rate - 2.0).abs() < EPS);
        assert!((frame.right_position - 20.0).abs() < EPS);
        assert!((frame.back_left_position - 12.0).abs() < EPS);

        let frame = step(&mut ds, &[], &mut motors, &mut encoders, &mut no_sinks(), 0.02);

        assert_eq!(encoders.resets, 1);
        assert!(!ds.encoder_reset_pending);
        assert_eq!(frame.left_position, 0.0);
        assert_eq!(frame.right_position, 0.0);
    }

    #[test]
    fn test_simulated_drive_forwards() {
        let mut ds = data_store(DriveMode::Arcade);
        let mut motors = SimDrivetrain::new(SimParams::default(), 0.02).unwrap();
        let mut encoders = motors.clone();

        motors
            .configure(&MotorConfig {
                open_loop_ramp_s: 0.0,
                ..Default::default()
            })
            .unwrap();

        let tcs = [Tc::Axes(ControllerAxes::new(-1.0, 0.0, 0.0))];
        let mut frame = step(&mut ds, &tcs, &mut motors, &mut encoders, &mut no_sinks(), 0.0);
        for i in 1..50 {
            frame = step(&mut ds, &[], &mut motors, &mut encoders, &mut no_sinks(), i as f64 * 0.02);
        }

        // Both sides move forwards together
        assert!(frame.left_position > 0.0);
        assert!((frame.left_position - frame.right_position).abs() < EPS);
        assert!((frame.left_rate - frame.right_rate).abs() < EPS);
        assert!((frame.left_position - 7000.0).abs() < 1e-6);
    }
}
