//! The playback controller: frame admission and the read cursor.

use std::cmp::Ordering;

use log::{debug, warn};

use vistra_cache::FrameCache;
use vistra_codec::{decode_json_frame, parse_local_frame, parse_net_frame, VisDataMessage};
use vistra_core::{compare_times, CachedFrame, PlaybackError};

use crate::config::{ConfigError, PlaybackConfig};

/// Lifecycle states of a trajectory session, derived from the
/// controller's cursor, wait lock, and cache occupancy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// No frames cached.
    Empty,
    /// Frames are arriving but the cursor is not yet positioned.
    Buffering,
    /// The cursor is on a valid frame.
    Ready,
    /// Locked, waiting for one specific frame number before accepting
    /// further frames.
    AwaitingFrame,
}

/// An incoming frame message from the network path.
#[derive(Debug)]
pub enum NetFrameData<'a> {
    /// A streamed binary frame, envelope included.
    Binary(&'a [u8]),
    /// A JSON frame bundle.
    Json(&'a VisDataMessage),
}

type ErrorHook = Box<dyn FnMut(PlaybackError)>;
type CacheLimitHook = Box<dyn FnMut()>;

/// Orchestrates incoming frames and exposes the cursor-based playback
/// API.
///
/// The controller exclusively owns its [`FrameCache`] and is the only
/// writer; consumers read cached frames by reference and never mutate
/// them. Network handlers never panic or propagate errors upward —
/// malformed and stale frames are dropped and reported through the
/// error hook, because the transport layer cannot recover call-stack
/// state from an async message event.
pub struct Playback {
    cache: FrameCache,
    cache_enabled: bool,
    cursor: Option<u32>,
    wait_for: Option<u32>,
    time_step_size: f32,
    total_steps: u64,
    on_error: Option<ErrorHook>,
    on_cache_limit_reached: Option<CacheLimitHook>,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    /// A controller with the default configuration.
    pub fn new() -> Self {
        Self {
            cache: FrameCache::new(),
            cache_enabled: true,
            cursor: None,
            wait_for: None,
            time_step_size: 0.0,
            total_steps: 0,
            on_error: None,
            on_cache_limit_reached: None,
        }
    }

    /// A controller with an explicit configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the configuration fails validation.
    pub fn with_config(config: PlaybackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            cache: FrameCache::with_limit(config.cache_limit_bytes),
            cache_enabled: config.cache_enabled,
            cursor: None,
            wait_for: None,
            time_step_size: 0.0,
            total_steps: 0,
            on_error: None,
            on_cache_limit_reached: None,
        })
    }

    // ── Hooks ───────────────────────────────────────────────────

    /// Register the hook for recoverable frame errors.
    pub fn set_on_error(&mut self, hook: impl FnMut(PlaybackError) + 'static) {
        self.on_error = Some(Box::new(hook));
    }

    /// Register the hook fired once per eviction sweep, so the owner
    /// can pause requesting frames or shift its live window.
    pub fn set_on_cache_limit_reached(&mut self, hook: impl FnMut() + 'static) {
        self.on_cache_limit_reached = Some(Box::new(hook));
    }

    // ── State accessors ─────────────────────────────────────────

    /// Current lifecycle state.
    pub fn state(&self) -> PlaybackState {
        if self.wait_for.is_some() {
            PlaybackState::AwaitingFrame
        } else if self.cache.is_empty() {
            PlaybackState::Empty
        } else if self.cursor.is_none() {
            PlaybackState::Buffering
        } else {
            PlaybackState::Ready
        }
    }

    /// The frame cache, read-only.
    pub fn cache(&self) -> &FrameCache {
        &self.cache
    }

    /// Simulation time covered by one frame (0 until trajectory info
    /// arrives).
    pub fn time_step_size(&self) -> f32 {
        self.time_step_size
    }

    /// Set the per-frame time step from trajectory metadata.
    pub fn set_time_step_size(&mut self, time_step_size: f32) {
        self.time_step_size = time_step_size;
    }

    /// Total frames the trajectory declares (0 until trajectory info
    /// arrives).
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Set the declared trajectory length from trajectory metadata.
    pub fn set_total_steps(&mut self, total_steps: u64) {
        self.total_steps = total_steps;
    }

    /// The cursor's frame number, if positioned.
    pub fn current_frame_number(&self) -> Option<u32> {
        self.cursor
    }

    // ── Frame intake ────────────────────────────────────────────

    /// Entry point for network frame messages, binary or JSON.
    ///
    /// Decodes, validates, and admits each frame. Decode and cache
    /// errors are reported through the error hook and the frame is
    /// dropped; this method never fails outward.
    pub fn parse_agents_from_net_data(&mut self, data: NetFrameData<'_>) {
        match data {
            NetFrameData::Binary(bytes) => match parse_net_frame(bytes) {
                Ok((_envelope, frame)) => self.admit(frame),
                Err(e) => self.fire_error(e.into()),
            },
            NetFrameData::Json(msg) => {
                for frame in &msg.bundle_data {
                    match decode_json_frame(frame) {
                        Ok(decoded) => self.admit(decoded),
                        Err(e) => self.fire_error(e.into()),
                    }
                }
            }
        }
    }

    /// Entry point for file-sourced binary frames (no network
    /// envelope).
    pub fn parse_agents_from_local_data(&mut self, bytes: &[u8]) {
        match parse_local_frame(bytes) {
            Ok(frame) => self.admit(frame),
            Err(e) => self.fire_error(e.into()),
        }
    }

    /// Admit one already-decoded frame.
    pub fn admit(&mut self, frame: CachedFrame) {
        if let Some(target) = self.wait_for {
            if frame.frame_number != target {
                // A seek raced with in-flight frames from the old
                // position; the client must not show a frame from the
                // wrong place even momentarily.
                debug!(
                    "discarding frame {} while waiting for frame {target}",
                    frame.frame_number
                );
                return;
            }
            self.wait_for = None;
            // A backward seek lands below the retained window; the
            // awaited frame starts a fresh one.
            if self
                .cache
                .first_frame_number()
                .is_some_and(|first| frame.frame_number < first)
            {
                self.cache.clear();
                self.cursor = None;
            }
        }

        if !self.cache_enabled {
            self.cursor = Some(frame.frame_number);
            self.cache.replace_all_with(frame);
            return;
        }

        if frame.size > self.cache.limit_bytes() {
            // This one frame is the whole visible window now.
            warn!(
                "frame {} ({} bytes) exceeds the entire cache budget ({} bytes)",
                frame.frame_number,
                frame.size,
                self.cache.limit_bytes()
            );
            self.cache.replace_all_with(frame);
            self.clamp_cursor_to_cache();
            self.fire_cache_limit_reached();
            return;
        }

        match self.cache.insert(frame) {
            Ok(_) => {
                if self.cache.evict_if_over_limit().is_some() {
                    self.clamp_cursor_to_cache();
                    self.fire_cache_limit_reached();
                }
            }
            Err(e) => self.fire_error(e.into()),
        }
    }

    /// Lock admission to one specific frame number.
    ///
    /// All frames with a different number are discarded until the
    /// matching one arrives, making server-driven seeks atomic from
    /// the client's perspective. A newer call supersedes the previous
    /// target; there is no timeout — callers issue a fresh seek if a
    /// match never arrives.
    pub fn wait_for_frame(&mut self, frame_number: u32) {
        self.wait_for = Some(frame_number);
    }

    // ── Cursor movement ─────────────────────────────────────────

    /// Move the cursor to the latest frame at or before `time`.
    ///
    /// No-op when the cache cannot satisfy the time; callers ensure
    /// buffering first via [`has_frame_covering`](Self::has_frame_covering).
    pub fn goto_time(&mut self, time: f32) {
        if let Some(frame) = self.cache.frame_at_time(time) {
            self.cursor = Some(frame.frame_number);
        }
    }

    /// Move the cursor directly to a frame number, clamped to the
    /// retained range.
    pub fn goto_frame(&mut self, frame_number: u32) {
        let (Some(first), Some(last)) = (
            self.cache.first_frame_number(),
            self.cache.last_frame_number(),
        ) else {
            return;
        };
        self.cursor = Some(frame_number.clamp(first, last));
    }

    /// Advance the cursor by one cached frame.
    ///
    /// Cheap and side-effect-free at the end of buffered data — the
    /// render loop polls this every tick.
    pub fn goto_next_frame(&mut self) {
        if self.at_latest_frame() {
            return;
        }
        match self.cursor {
            None => self.cursor = self.cache.first_frame_number(),
            Some(current) => {
                if let Some(next) = self.cache.next_after(current) {
                    self.cursor = Some(next.frame_number);
                }
            }
        }
    }

    /// Whether the cursor sits on the last cached frame.
    ///
    /// The render loop uses this to decide whether to request more
    /// streaming data.
    pub fn at_latest_frame(&self) -> bool {
        match (self.cursor, self.cache.last_frame_number()) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(cursor), Some(last)) => cursor >= last,
        }
    }

    /// The frame to draw now.
    ///
    /// Returns the designated empty frame (frame 0, time 0, zero
    /// agents) rather than an `Option` when nothing is cached, so
    /// render code reads `.time`/`.frame_number` without branching.
    /// An unpositioned cursor reads the earliest retained frame; a
    /// cursor that has slipped off the retained range reads the
    /// nearest end.
    pub fn current_frame_data(&self) -> CachedFrame {
        let (Some(first), Some(last)) = (self.cache.first(), self.cache.last()) else {
            return CachedFrame::empty();
        };
        match self.cursor {
            None => first.clone(),
            Some(cursor) => match self.cache.frame_at_number(cursor) {
                Some(frame) => frame.clone(),
                None if cursor < first.frame_number => first.clone(),
                None if cursor > last.frame_number => last.clone(),
                None => CachedFrame::empty(),
            },
        }
    }

    /// Whether `time` falls within the buffered span, using an
    /// epsilon scaled to the trajectory time step.
    ///
    /// Decides whether a seek is satisfiable without requesting more
    /// data from the source.
    pub fn has_frame_covering(&self, time: f32) -> bool {
        if !self.cache_enabled {
            return false;
        }
        match (self.cache.first(), self.cache.last()) {
            (Some(first), Some(last)) => {
                compare_times(time, first.time, self.time_step_size, 0.01) != Ordering::Less
                    && compare_times(time, last.time, self.time_step_size, 0.01)
                        != Ordering::Greater
            }
            _ => false,
        }
    }

    // ── Resets and teardown ─────────────────────────────────────

    /// Empty the cache and release the cursor and wait lock.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.cursor = None;
        self.wait_for = None;
    }

    /// Full reset for a trajectory change. Idempotent.
    pub fn clear_for_new_trajectory(&mut self) {
        self.clear_cache();
        self.time_step_size = 0.0;
        self.total_steps = 0;
    }

    /// Explicit teardown: drop registered hooks and buffered frames.
    ///
    /// The owner calls this when the viewer shuts down; the controller
    /// holds no process-global resources of its own.
    pub fn dispose(&mut self) {
        self.clear_for_new_trajectory();
        self.on_error = None;
        self.on_cache_limit_reached = None;
    }

    // ── Internals ───────────────────────────────────────────────

    /// Report a recoverable error on behalf of the session layer.
    pub(crate) fn report(&mut self, error: PlaybackError) {
        self.fire_error(error);
    }

    /// Keep the cursor inside the retained window after eviction.
    fn clamp_cursor_to_cache(&mut self) {
        if let (Some(cursor), Some(first)) = (self.cursor, self.cache.first_frame_number()) {
            if cursor < first {
                self.cursor = Some(first);
            }
        }
    }

    fn fire_error(&mut self, error: PlaybackError) {
        warn!("dropped frame: {error}");
        if let Some(hook) = self.on_error.as_mut() {
            hook(error);
        }
    }

    fn fire_cache_limit_reached(&mut self) {
        if let Some(hook) = self.on_cache_limit_reached.as_mut() {
            hook();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use vistra_core::{CacheError, CodecError};
    use vistra_test_utils::{bundle, sized_frame, test_frame};

    fn five_frame_controller() -> Playback {
        // Frames 0..4 at times 0, 10, 20, 30, 40.
        let mut playback = Playback::new();
        let msg = bundle(&[(0, 0.0), (1, 10.0), (2, 20.0), (3, 30.0), (4, 40.0)]);
        playback.parse_agents_from_net_data(NetFrameData::Json(&msg));
        playback
    }

    #[test]
    fn empty_controller_serves_the_sentinel_frame() {
        let playback = Playback::new();
        assert_eq!(playback.state(), PlaybackState::Empty);
        let frame = playback.current_frame_data();
        assert_eq!(frame.frame_number, 0);
        assert_eq!(frame.time, 0.0);
        assert_eq!(frame.agent_count, 0);
    }

    #[test]
    fn json_bundle_fills_the_cache() {
        let playback = five_frame_controller();
        assert_eq!(playback.cache().len(), 5);
        assert_eq!(playback.state(), PlaybackState::Buffering);
    }

    #[test]
    fn goto_time_positions_the_cursor_stepwise() {
        let mut playback = five_frame_controller();
        playback.goto_time(25.0);
        assert_eq!(playback.current_frame_data().frame_number, 2);
        assert_eq!(playback.current_frame_data().time, 20.0);
        assert_eq!(playback.state(), PlaybackState::Ready);
    }

    #[test]
    fn goto_time_is_a_no_op_when_unsatisfiable() {
        let mut playback = five_frame_controller();
        playback.goto_time(20.0);
        // Before the first frame and not the zero convenience: stays put.
        playback.goto_time(-5.0);
        assert_eq!(playback.current_frame_data().frame_number, 2);
    }

    #[test]
    fn goto_frame_clamps_to_the_retained_range() {
        let mut playback = five_frame_controller();
        playback.goto_frame(99);
        assert_eq!(playback.current_frame_data().frame_number, 4);
        playback.goto_frame(2);
        assert_eq!(playback.current_frame_data().frame_number, 2);
    }

    #[test]
    fn goto_next_frame_walks_to_the_end_and_stops() {
        let mut playback = five_frame_controller();
        assert!(!playback.at_latest_frame());

        let mut visited = Vec::new();
        while !playback.at_latest_frame() {
            playback.goto_next_frame();
            visited.push(playback.current_frame_data().frame_number);
        }
        assert_eq!(visited, vec![0, 1, 2, 3, 4]);

        // No-op at the end of buffered data.
        playback.goto_next_frame();
        assert_eq!(playback.current_frame_data().frame_number, 4);
        assert!(playback.at_latest_frame());
    }

    #[test]
    fn at_latest_frame_on_empty_controller() {
        let playback = Playback::new();
        assert!(playback.at_latest_frame());
    }

    #[test]
    fn wait_for_frame_discards_until_the_match() {
        let mut playback = five_frame_controller();
        playback.wait_for_frame(5);
        assert_eq!(playback.state(), PlaybackState::AwaitingFrame);

        // Frames 3 and 4 are in-flight stragglers: discarded without
        // any state change.
        playback.admit(test_frame(3, 30.0, 2));
        playback.admit(test_frame(4, 40.0, 2));
        assert_eq!(playback.cache().len(), 5);
        assert_eq!(playback.cache().frame_at_number(3).unwrap().agent_count, 1);
        assert_eq!(playback.state(), PlaybackState::AwaitingFrame);

        // The match releases the lock.
        playback.admit(test_frame(5, 50.0, 1));
        assert_eq!(playback.cache().len(), 6);
        assert_eq!(playback.state(), PlaybackState::Buffering);

        // Admission is back to normal.
        playback.admit(test_frame(6, 60.0, 1));
        assert_eq!(playback.cache().len(), 7);
    }

    #[test]
    fn a_newer_wait_supersedes_the_old_target() {
        let mut playback = five_frame_controller();
        playback.wait_for_frame(10);
        playback.wait_for_frame(7);
        playback.admit(test_frame(10, 100.0, 1));
        assert_eq!(playback.cache().len(), 5, "old target must not admit");
        playback.admit(test_frame(7, 70.0, 1));
        assert_eq!(playback.cache().len(), 6);
    }

    #[test]
    fn awaited_frame_below_the_window_starts_a_fresh_one() {
        // Frames 0..4 were evicted long ago; the cache holds 5..9.
        let mut playback = Playback::new();
        for n in 5..10 {
            playback.admit(test_frame(n, n as f32 * 10.0, 1));
        }
        playback.goto_frame(9);

        // Seek back to frame 2: the awaited frame lands below the
        // retained window, so it begins a new one instead of being
        // rejected as stale.
        playback.wait_for_frame(2);
        playback.admit(test_frame(2, 20.0, 3));
        assert_eq!(playback.cache().len(), 1);
        assert_eq!(playback.cache().first_frame_number(), Some(2));
        assert_eq!(playback.current_frame_data().agent_count, 3);
    }

    #[test]
    fn awaited_frame_already_cached_replaces_in_place() {
        let mut playback = five_frame_controller();
        playback.wait_for_frame(0);
        playback.admit(test_frame(0, 0.0, 3));
        assert_eq!(playback.cache().len(), 5);
        assert_eq!(playback.cache().frame_at_number(0).unwrap().agent_count, 3);
    }

    #[test]
    fn stale_frames_are_reported_not_thrown() {
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&errors);

        let mut playback = Playback::new();
        playback.set_on_error(move |e| sink.borrow_mut().push(e));
        for n in 5..8 {
            playback.admit(test_frame(n, n as f32, 1));
        }
        playback.admit(test_frame(2, 2.0, 1));

        assert_eq!(playback.cache().len(), 3);
        let errors = errors.borrow();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            PlaybackError::Cache(CacheError::StaleFrame {
                frame_number: 2,
                earliest: 5
            })
        ));
    }

    #[test]
    fn malformed_frames_are_reported_not_thrown() {
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&errors);

        let mut playback = five_frame_controller();
        playback.set_on_error(move |e| sink.borrow_mut().push(e));

        let mut msg = bundle(&[(5, 50.0)]);
        msg.bundle_data[0].data.truncate(7); // truncated agent header
        playback.parse_agents_from_net_data(NetFrameData::Json(&msg));

        assert_eq!(playback.cache().len(), 5, "bad frame never lands");
        let errors = errors.borrow();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], PlaybackError::Codec(CodecError::MalformedFrame { .. })));
    }

    #[test]
    fn eviction_fires_the_limit_hook_once_per_sweep() {
        let per_frame = test_frame(0, 0.0, 1).size;
        let fired = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&fired);

        let mut playback = Playback::with_config(PlaybackConfig {
            cache_limit_bytes: per_frame + 1,
            cache_enabled: true,
        })
        .unwrap();
        playback.set_on_cache_limit_reached(move || *sink.borrow_mut() += 1);

        playback.admit(test_frame(0, 0.0, 1));
        assert_eq!(*fired.borrow(), 0);

        // One insert triggers one sweep evicting one frame: one call.
        playback.admit(test_frame(1, 1.0, 1));
        assert_eq!(*fired.borrow(), 1);
        assert_eq!(playback.cache().first_frame_number(), Some(1));

        playback.admit(test_frame(2, 2.0, 1));
        assert_eq!(*fired.borrow(), 2);
    }

    #[test]
    fn oversized_frame_replaces_the_whole_cache() {
        let fired = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&fired);

        let mut playback = Playback::with_config(PlaybackConfig {
            cache_limit_bytes: 512,
            cache_enabled: true,
        })
        .unwrap();
        playback.set_on_cache_limit_reached(move || *sink.borrow_mut() += 1);

        playback.admit(test_frame(0, 0.0, 1));
        playback.admit(test_frame(1, 1.0, 1));

        let oversized = sized_frame(2, 2.0, 4096);
        playback.admit(oversized);

        assert_eq!(playback.cache().len(), 1);
        assert_eq!(playback.cache().first_frame_number(), Some(2));
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn eviction_pulls_the_cursor_back_into_range() {
        let per_frame = test_frame(0, 0.0, 1).size;
        let mut playback = Playback::with_config(PlaybackConfig {
            cache_limit_bytes: per_frame * 2 + 1,
            cache_enabled: true,
        })
        .unwrap();

        playback.admit(test_frame(0, 0.0, 1));
        playback.admit(test_frame(1, 1.0, 1));
        playback.goto_frame(0);

        // Frame 2 evicts frame 0 out from under the cursor.
        playback.admit(test_frame(2, 2.0, 1));
        assert_eq!(playback.current_frame_data().frame_number, 1);
    }

    #[test]
    fn disabled_cache_keeps_only_the_newest_frame() {
        let mut playback = Playback::with_config(PlaybackConfig {
            cache_enabled: false,
            ..PlaybackConfig::default()
        })
        .unwrap();

        playback.admit(test_frame(0, 0.0, 1));
        playback.admit(test_frame(1, 10.0, 2));
        assert_eq!(playback.cache().len(), 1);
        assert_eq!(playback.current_frame_data().frame_number, 1);
        assert!(!playback.has_frame_covering(10.0));
    }

    #[test]
    fn has_frame_covering_uses_the_time_step_epsilon() {
        let mut playback = five_frame_controller();
        playback.set_time_step_size(10.0);
        assert!(playback.has_frame_covering(0.0));
        assert!(playback.has_frame_covering(40.0));
        assert!(playback.has_frame_covering(25.0));
        // Within a hundredth of a step of the edge.
        assert!(playback.has_frame_covering(40.05));
        assert!(!playback.has_frame_covering(41.0));
        assert!(!playback.has_frame_covering(-1.0));
    }

    #[test]
    fn clear_cache_releases_cursor_and_lock() {
        let mut playback = five_frame_controller();
        playback.goto_frame(3);
        playback.wait_for_frame(9);
        playback.clear_cache();
        assert_eq!(playback.state(), PlaybackState::Empty);
        assert_eq!(playback.current_frame_number(), None);
        assert_eq!(playback.current_frame_data(), CachedFrame::empty());
    }

    #[test]
    fn clear_for_new_trajectory_is_idempotent() {
        let mut playback = five_frame_controller();
        playback.set_time_step_size(0.5);
        playback.set_total_steps(150);
        playback.goto_frame(2);

        playback.clear_for_new_trajectory();
        let snapshot = (
            playback.state(),
            playback.time_step_size(),
            playback.total_steps(),
            playback.current_frame_number(),
        );
        playback.clear_for_new_trajectory();
        assert_eq!(
            snapshot,
            (PlaybackState::Empty, 0.0, 0, None)
        );
        assert_eq!(playback.state(), PlaybackState::Empty);
        assert_eq!(playback.time_step_size(), 0.0);
        assert_eq!(playback.total_steps(), 0);
        assert_eq!(playback.current_frame_number(), None);
    }

    #[test]
    fn replaced_duplicate_frame_serves_the_new_payload() {
        let mut playback = five_frame_controller();
        playback.goto_frame(2);
        playback.admit(test_frame(2, 20.0, 4));
        assert_eq!(playback.cache().len(), 5);
        assert_eq!(playback.current_frame_data().agent_count, 4);
    }

    #[test]
    fn binary_net_frames_decode_through_the_envelope() {
        use vistra_codec::encode_net_frame;
        use vistra_test_utils::sphere_floats;

        let mut playback = Playback::new();
        let bytes = encode_net_frame(2, 1, "actin.traj", 0, 0.0, &sphere_floats(0, 7));
        playback.parse_agents_from_net_data(NetFrameData::Binary(&bytes));

        assert_eq!(playback.cache().len(), 1);
        assert_eq!(playback.current_frame_data().agent_count, 1);
    }
}
