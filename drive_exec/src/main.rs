//! Main drive executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Operator input acquisition (script or gamepad)
//!         - Drive cycle (see `drive_lib::cycle`):
//!             - Telecommand processing
//!             - Input shaping
//!             - Drive control and motor output
//!             - Odometry
//!             - Telemetry
//!         - Sleep until the next cycle
//!
//! # Modules
//!
//! All cyclic modules (e.g. `input_shaper`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::Instant;
use structopt::StructOpt;

// Internal
use comms_if::tc::Tc;
use drive_lib::{
    cycle,
    data_store::DataStore,
    mode_ctrl::ModeCtrl,
    params::DriveExecParams,
    ports::{EncoderFeedback, MotorOutput, TelemetrySink},
    sim_drive::SimDrivetrain,
    tm_sink::{ArchiveTmSink, LogTmSink},
};
#[cfg(feature = "gamepad")]
use drive_lib::{data_store::SafeModeCause, gamepad::GamepadInput};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingTcs, ScriptInterpreter},
    session::{self, Session},
    time::frequency_to_period,
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Teleoperated differential drive executable.
#[derive(Debug, StructOpt)]
#[structopt(name = "drive_exec")]
struct Opt {
    /// Path to an input script to replay.
    #[structopt(parse(from_os_str))]
    script: Option<PathBuf>,

    /// Take operator input from a gamepad.
    #[structopt(long)]
    gamepad: bool,

    /// Minimum log level, `info` or more verbose.
    #[structopt(long, default_value = "debug")]
    log_level: LevelFilter,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Various sources for the telecommands incoming to the exec.
enum TcSource {
    Script(ScriptInterpreter),
    #[cfg(feature = "gamepad")]
    Gamepad(GamepadInput),
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("drive_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(opt.log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Drive Executable\n");
    info!("Running on: {}", host::get_platform());
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let params: DriveExecParams = util::params::load("drive_exec.toml")
        .wrap_err("Could not load drive_exec params")?;

    let cycle_period = frequency_to_period(params.cycle_frequency_hz)
        .ok_or_else(|| eyre!(
            "Invalid cycle frequency: {} Hz", params.cycle_frequency_hz
        ))?;

    info!("Exec parameters loaded, cycle frequency {} Hz", params.cycle_frequency_hz);

    // ---- INITIALISE TC SOURCE ----

    let mut tc_source = select_tc_source(&opt)?;

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();
    ds.mode_ctrl = ModeCtrl::new(params.initial_mode);
    ds.drive_mode = params.initial_mode;

    // ---- INITIALISE MODULES ----

    ds.input_shaper.init("input_shaper.toml")
        .wrap_err("Failed to initialise InputShaper")?;
    info!("InputShaper init complete");

    ds.drive_ctrl.init(())
        .wrap_err("Failed to initialise DriveCtrl")?;
    info!("DriveCtrl init complete");

    ds.odometry.init("odometry.toml")
        .wrap_err("Failed to initialise Odometry")?;
    info!("Odometry init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE DRIVETRAIN ----

    let mut motors = SimDrivetrain::new(params.sim.clone(), cycle_period.as_secs_f64())
        .wrap_err("Failed to initialise the simulated drivetrain")?;
    let mut encoders = motors.clone();

    motors.configure(&params.motor_config)
        .wrap_err("Failed to configure the drive motors")?;
    encoders.reset()
        .wrap_err("Failed to reset the encoders")?;
    info!("Drivetrain initialised");

    // ---- INITIALISE TELEMETRY ----

    let mut tm_sinks: Vec<Box<dyn TelemetrySink>> = Vec::new();

    if params.log_tm {
        tm_sinks.push(Box::new(LogTmSink));
    }
    if params.archive_tm {
        tm_sinks.push(Box::new(
            ArchiveTmSink::new(&session)
                .wrap_err("Failed to create the telemetry archive")?
        ));
    }

    info!("{} telemetry sink(s) initialised", tm_sinks.len());

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();
        let cycle_time_s = session::get_elapsed_seconds();

        // ---- OPERATOR INPUT ----

        let tcs: Vec<Tc> = match tc_source {
            TcSource::Script(ref mut si) => match si.get_pending_tcs(cycle_time_s) {
                PendingTcs::None => Vec::new(),
                PendingTcs::Some(tcs) => tcs,
                // Exit if end of script reached
                PendingTcs::EndOfScript => {
                    info!("End of TC script reached, stopping");
                    break
                }
            },
            #[cfg(feature = "gamepad")]
            TcSource::Gamepad(ref mut gamepad) => {
                let poll = gamepad.poll();

                if poll.connected {
                    ds.make_unsafe(SafeModeCause::NoOperatorInput).ok();
                }
                else {
                    ds.make_safe(SafeModeCause::NoOperatorInput);
                }

                poll.tcs
            }
        };

        // ---- DRIVE CYCLE ----

        cycle::step(
            &mut ds,
            &tcs,
            &mut motors,
            &mut encoders,
            &mut tm_sinks,
            cycle_time_s,
        );

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            },
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }
    }

    // ---- SHUTDOWN ----

    if let Err(e) = motors.stop() {
        warn!("Could not stop the motors: {}", e);
    }

    info!("End of execution after {} cycles", ds.num_cycles);

    session.exit();

    Ok(())
}

/// Pick the TC source from the command line options.
fn select_tc_source(opt: &Opt) -> Result<TcSource, Report> {
    match (&opt.script, opt.gamepad) {
        (Some(_), true) => Err(eyre!(
            "Expected either a script or --gamepad, not both"
        )),
        (Some(path), false) => {
            info!("Loading script from {:?}", path);

            // Load the script interpreter
            let si = ScriptInterpreter::new(path)
                .wrap_err("Failed to load script")?;

            // Display some info
            info!(
                "Loaded script lasts {:.02} s and contains {} TCs\n",
                si.get_duration(),
                si.get_num_tcs()
            );

            Ok(TcSource::Script(si))
        },
        #[cfg(feature = "gamepad")]
        (None, true) => {
            let gamepad = GamepadInput::new()
                .wrap_err("Failed to initialise the gamepad")?;
            info!("Gamepad input initialised\n");

            Ok(TcSource::Gamepad(gamepad))
        },
        #[cfg(not(feature = "gamepad"))]
        (None, true) => Err(eyre!(
            "Gamepad input requires drive_exec to be built with the `gamepad` feature"
        )),
        (None, false) => Err(eyre!(
            "No operator input, provide a script path or --gamepad"
        )),
    }
}
