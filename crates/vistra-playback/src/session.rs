//! The trajectory session: dispatch, metadata normalization, and
//! playback wired together.

use log::{debug, info};

use vistra_codec::VisDataMessage;
use vistra_core::{CodecError, MsgType, PlaybackError, TrajectoryError};
use vistra_trajectory::{update_trajectory_file_info_format, TrajectoryInfo, TrajectoryInfoAny};

use crate::config::{ConfigError, PlaybackConfig};
use crate::controller::{NetFrameData, Playback};
use crate::dispatch::{Dispatcher, InboundMessage};
use crate::inbox::Inbox;
use crate::sources::{LocalFrame, RemoteSimulator, TrajectoryFile};

type AdvisoryHook = Box<dyn FnMut(String)>;

/// Mutable session state the dispatch handlers operate on.
struct SessionState {
    playback: Playback,
    trajectory_info: Option<TrajectoryInfo>,
    remote: Option<Box<dyn RemoteSimulator>>,
    on_geometry_advisory: Option<AdvisoryHook>,
    /// A fatal trajectory-load failure raised inside a handler,
    /// surfaced by `handle_message` after dispatch returns.
    fatal: Option<TrajectoryError>,
}

impl SessionState {
    fn handle_trajectory_info(&mut self, value: serde_json::Value) {
        let any: TrajectoryInfoAny = match serde_json::from_value(value) {
            Ok(any) => any,
            Err(e) => {
                self.fatal = Some(TrajectoryError::InvalidMessage {
                    detail: format!("trajectory info did not parse: {e}"),
                });
                return;
            }
        };
        self.load_trajectory_info(any);
    }

    fn load_trajectory_info(&mut self, any: TrajectoryInfoAny) {
        let mut advisories = Vec::new();
        let mut collect = |message: String| advisories.push(message);

        match update_trajectory_file_info_format(any, Some(&mut collect)) {
            Ok(info) => {
                info!(
                    "trajectory loaded: {} steps of {} {}",
                    info.total_steps, info.time_step_size, info.time_units.name
                );
                self.playback.clear_for_new_trajectory();
                self.playback.set_time_step_size(info.time_step_size as f32);
                self.playback.set_total_steps(info.total_steps);
                self.trajectory_info = Some(info);
            }
            Err(e) => self.fatal = Some(e),
        }

        for advisory in advisories {
            if let Some(hook) = self.on_geometry_advisory.as_mut() {
                hook(advisory);
            }
        }
    }

    fn handle_vis_data(&mut self, value: serde_json::Value) {
        match serde_json::from_value::<VisDataMessage>(value) {
            Ok(msg) => {
                self.playback
                    .parse_agents_from_net_data(NetFrameData::Json(&msg));
            }
            Err(e) => self.playback.report(PlaybackError::Codec(
                CodecError::MalformedFrame {
                    detail: format!("JSON frame bundle did not parse: {e}"),
                },
            )),
        }
    }
}

/// One trajectory viewing session.
///
/// Owns the playback controller, the normalized trajectory metadata,
/// and the message dispatch table (handlers are registered once, at
/// construction). Messages arrive either directly via
/// [`handle_message`](Self::handle_message) or in batches via
/// [`drain_inbox`](Self::drain_inbox); frames can also come from a
/// [`TrajectoryFile`] via [`load_file`](Self::load_file).
pub struct TrajectorySession {
    state: SessionState,
    dispatcher: Dispatcher<SessionState>,
}

impl TrajectorySession {
    /// A session with the given playback configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the configuration fails validation.
    pub fn new(config: PlaybackConfig) -> Result<Self, ConfigError> {
        let playback = Playback::with_config(config)?;

        let mut dispatcher: Dispatcher<SessionState> = Dispatcher::new();
        dispatcher.on_json(MsgType::TrajectoryFileInfo, SessionState::handle_trajectory_info);
        dispatcher.on_json(MsgType::VisDataArrive, SessionState::handle_vis_data);
        dispatcher.on_binary(MsgType::VisDataArrive, |state, bytes| {
            state
                .playback
                .parse_agents_from_net_data(NetFrameData::Binary(&bytes));
        });

        Ok(Self {
            state: SessionState {
                playback,
                trajectory_info: None,
                remote: None,
                on_geometry_advisory: None,
                fatal: None,
            },
            dispatcher,
        })
    }

    /// Attach the streaming backend used for seek requests.
    pub fn connect_remote(&mut self, remote: Box<dyn RemoteSimulator>) {
        self.state.remote = Some(remote);
    }

    /// Register the hook for non-fatal geometry advisories raised
    /// while normalizing trajectory metadata.
    pub fn set_on_geometry_advisory(&mut self, hook: impl FnMut(String) + 'static) {
        self.state.on_geometry_advisory = Some(Box::new(hook));
    }

    /// The playback controller, read-only.
    pub fn playback(&self) -> &Playback {
        &self.state.playback
    }

    /// The playback controller, for cursor control and hooks.
    pub fn playback_mut(&mut self) -> &mut Playback {
        &mut self.state.playback
    }

    /// The normalized metadata of the loaded trajectory, once it has
    /// arrived.
    pub fn trajectory_info(&self) -> Option<&TrajectoryInfo> {
        self.state.trajectory_info.as_ref()
    }

    /// Route one inbound message through the dispatch table.
    ///
    /// Frame-level problems are reported through the playback error
    /// hook and never fail this call.
    ///
    /// # Errors
    ///
    /// [`TrajectoryError`] when trajectory metadata is unusable
    /// (unsupported version, unparseable message) — fatal to that
    /// trajectory load.
    pub fn handle_message(&mut self, message: InboundMessage) -> Result<(), TrajectoryError> {
        let _ = self.dispatcher.dispatch(&mut self.state, message);
        match self.state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Drain every pending inbox message through the dispatch table.
    ///
    /// Returns the number of messages processed, or the first fatal
    /// trajectory error encountered (remaining messages are still
    /// drained so the inbox never backs up).
    ///
    /// # Errors
    ///
    /// The first [`TrajectoryError`] raised while draining.
    pub fn drain_inbox(&mut self, inbox: &Inbox) -> Result<usize, TrajectoryError> {
        let mut first_fatal = None;
        let processed = inbox.drain(|message| {
            if let Err(e) = self.handle_message(message) {
                first_fatal.get_or_insert(e);
            }
        });
        match first_fatal {
            Some(err) => Err(err),
            None => Ok(processed),
        }
    }

    /// Load an entire trajectory file: metadata, then every frame.
    ///
    /// # Errors
    ///
    /// [`TrajectoryError`] when the file's metadata is unusable.
    pub fn load_file(&mut self, file: &dyn TrajectoryFile) -> Result<(), TrajectoryError> {
        self.state.load_trajectory_info(file.trajectory_info().clone());
        if let Some(err) = self.state.fatal.take() {
            return Err(err);
        }

        debug!("loading {} frames from file", file.total_frames());
        for frame_number in 0..file.total_frames() as u32 {
            match file.frame(frame_number) {
                Some(LocalFrame::Json(frame)) => match vistra_codec::decode_json_frame(frame) {
                    Ok(decoded) => self.state.playback.admit(decoded),
                    Err(e) => self.state.playback.report(e.into()),
                },
                Some(LocalFrame::Binary(bytes)) => {
                    self.state.playback.parse_agents_from_local_data(bytes);
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Seek to a simulation time.
    ///
    /// Satisfied locally when the cache covers the time; otherwise the
    /// request goes to the remote backend and frames arrive through
    /// the normal message path.
    pub fn goto_time(&mut self, time: f32) {
        if self.state.playback.has_frame_covering(time) {
            self.state.playback.goto_time(time);
        } else if let Some(remote) = self.state.remote.as_mut() {
            debug!("time {time} not buffered; requesting from backend");
            remote.request_frame_by_time(time);
        }
    }

    /// Seek to a frame number.
    ///
    /// Satisfied locally when the frame is cached; otherwise the
    /// controller locks onto that frame number and the request goes
    /// to the remote backend.
    pub fn goto_frame(&mut self, frame_number: u32) {
        if self.state.playback.cache().frame_at_number(frame_number).is_some() {
            self.state.playback.goto_frame(frame_number);
        } else if let Some(remote) = self.state.remote.as_mut() {
            debug!("frame {frame_number} not buffered; requesting from backend");
            self.state.playback.wait_for_frame(frame_number);
            remote.request_frame(frame_number);
        }
    }

    /// Tear the session down: dispose the controller and detach the
    /// backend. The owner calls this instead of relying on any
    /// process-global teardown.
    pub fn dispose(&mut self) {
        self.state.playback.dispose();
        self.state.remote = None;
        self.state.on_geometry_advisory = None;
        self.state.trajectory_info = None;
    }
}
