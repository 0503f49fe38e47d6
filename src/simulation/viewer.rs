use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

use super::scene::{FieldConfig, Scene, SceneError, SceneSnapshot};

/// Roughly one display refresh at 60 Hz.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Uninitialized,
    Mounted,
    Unmounted,
}

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("viewer is already mounted")]
    AlreadyMounted,
    #[error("viewer was unmounted and cannot be mounted again")]
    Unmounted,
    #[error("viewer is not mounted")]
    NotMounted,
    #[error("mounting requires a running tokio runtime")]
    NoRuntime,
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Shared between the viewer and its frame task. `None` once torn down.
type SceneSlot = Arc<Mutex<Option<Scene>>>;

pub struct Viewer {
    state: ViewerState,
    frame_interval: Duration,
    scene: SceneSlot,
    frames: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl Viewer {
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            state: ViewerState::Uninitialized,
            frame_interval,
            scene: Arc::new(Mutex::new(None)),
            frames: Arc::new(AtomicU64::new(0)),
            task: None,
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    /// Frames rendered since mount.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    /// Builds the scene and starts the frame loop on the current runtime.
    pub fn mount(&mut self, config: FieldConfig) -> Result<(), ViewerError> {
        match self.state {
            ViewerState::Mounted => return Err(ViewerError::AlreadyMounted),
            ViewerState::Unmounted => return Err(ViewerError::Unmounted),
            ViewerState::Uninitialized => {}
        }
        let runtime = Handle::try_current().map_err(|_| ViewerError::NoRuntime)?;

        let scene = Scene::build(config)?;
        *self.scene.lock().unwrap_or_else(PoisonError::into_inner) = Some(scene);

        let slot = Arc::clone(&self.scene);
        let frames = Arc::clone(&self.frames);
        let period = self.frame_interval;
        self.task = Some(runtime.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
                let Some(scene) = guard.as_mut() else {
                    break;
                };
                scene.step();
                frames.fetch_add(1, Ordering::Release);
            }
            debug!("viewer frame loop stopped");
        }));

        self.state = ViewerState::Mounted;
        info!("viewer mounted with {} particles", config.particles);
        Ok(())
    }

    /// Stops the frame loop and releases the scene. No frame runs after this returns.
    pub fn unmount(&mut self) -> Result<(), ViewerError> {
        if self.state != ViewerState::Mounted {
            return Err(ViewerError::NotMounted);
        }
        self.teardown();
        self.state = ViewerState::Unmounted;
        info!("viewer unmounted after {} frames", self.frames());
        Ok(())
    }

    pub fn snapshot(&self) -> Option<SceneSnapshot> {
        self.scene
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Scene::snapshot)
    }

    fn teardown(&mut self) {
        // Clearing the slot under the lock is what stops frames; abort only reclaims the task.
        self.scene
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn small_field() -> FieldConfig {
        FieldConfig {
            particles: 64,
            seed: 3,
            ..FieldConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn frames_advance_only_while_mounted() {
        let mut viewer = Viewer::new(Duration::from_millis(10));
        assert_eq!(viewer.state(), ViewerState::Uninitialized);
        assert!(viewer.snapshot().is_none());

        viewer.mount(small_field()).unwrap();
        sleep(Duration::from_millis(105)).await;
        let mounted_frames = viewer.frames();
        assert!(mounted_frames >= 5, "only {mounted_frames} frames");
        assert_eq!(viewer.snapshot().unwrap().frame, mounted_frames);

        viewer.unmount().unwrap();
        assert_eq!(viewer.state(), ViewerState::Unmounted);
        let at_teardown = viewer.frames();

        sleep(Duration::from_millis(200)).await;
        assert_eq!(viewer.frames(), at_teardown);
        assert!(viewer.snapshot().is_none());
    }

    #[tokio::test]
    async fn lifecycle_transitions_are_enforced() {
        let mut viewer = Viewer::default();
        assert!(matches!(viewer.unmount(), Err(ViewerError::NotMounted)));

        viewer.mount(small_field()).unwrap();
        assert!(matches!(
            viewer.mount(small_field()),
            Err(ViewerError::AlreadyMounted)
        ));

        viewer.unmount().unwrap();
        assert!(matches!(
            viewer.mount(small_field()),
            Err(ViewerError::Unmounted)
        ));
        assert!(matches!(viewer.unmount(), Err(ViewerError::NotMounted)));
    }

    #[tokio::test]
    async fn invalid_field_leaves_viewer_unmounted() {
        let mut viewer = Viewer::default();
        let err = viewer
            .mount(FieldConfig {
                particles: usize::MAX,
                ..FieldConfig::default()
            })
            .unwrap_err();
        assert!(matches!(err, ViewerError::Scene(_)));
        assert_eq!(viewer.state(), ViewerState::Uninitialized);
    }

    #[test]
    fn mount_outside_runtime_is_rejected() {
        let mut viewer = Viewer::default();
        assert!(matches!(
            viewer.mount(small_field()),
            Err(ViewerError::NoRuntime)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_a_mounted_viewer_stops_the_loop() {
        let mut viewer = Viewer::new(Duration::from_millis(10));
        viewer.mount(small_field()).unwrap();
        let frames = Arc::clone(&viewer.frames);
        sleep(Duration::from_millis(50)).await;
        drop(viewer);

        let at_drop = frames.load(Ordering::Acquire);
        sleep(Duration::from_millis(100)).await;
        assert_eq!(frames.load(Ordering::Acquire), at_drop);
    }
}
