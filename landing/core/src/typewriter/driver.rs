//! Typewriter Driver
//!
//! Runs a [`TypingAnimator`] on its own tokio task. The task is the single
//! owner of the animator; everything else talks to it through a command
//! channel and watches its output through a `watch` channel.
//!
//! Exactly one tick is pending at any time. A qualifying phrase-list reset
//! drops the pending tick before the new state is published, and dropping
//! the [`Typewriter`] handle cancels the task so no stale tick can fire.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, trace};

use super::machine::{AnimatorState, Mode, PhraseUpdate, TypingAnimator};
use super::phrases::PhraseList;

/// Glyph drawn after the display text to suggest a cursor
pub const CARET: char = '|';

/// One published animator state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Displayed prefix of the current phrase
    pub text: String,
    /// Index of the current phrase
    pub index: usize,
    /// Animator mode when the frame was published
    pub mode: Mode,
    /// Publication counter, starting at 0 for the initial frame
    pub seq: u64,
}

impl Frame {
    fn from_state(state: AnimatorState, seq: u64) -> Self {
        Self {
            text: state.display_text,
            index: state.index,
            mode: state.mode,
            seq,
        }
    }

    /// The display text followed by the caret glyph
    #[must_use]
    pub fn with_caret(&self) -> String {
        let mut out = String::with_capacity(self.text.len() + CARET.len_utf8());
        out.push_str(&self.text);
        out.push(CARET);
        out
    }
}

/// Something that shows typewriter output
pub trait Renderer {
    /// Show `text`, which already carries the trailing caret
    fn render(&mut self, text: &str);
}

impl Renderer for Vec<String> {
    fn render(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

/// Feed every published frame into `renderer` until the typewriter stops
pub async fn pump<R: Renderer + ?Sized>(mut frames: watch::Receiver<Frame>, renderer: &mut R) {
    loop {
        let line = frames.borrow_and_update().with_caret();
        renderer.render(&line);
        if frames.changed().await.is_err() {
            break;
        }
    }
}

enum Command {
    SetPhrases(PhraseList),
    SetResetOnPhraseChange(bool),
}

/// Handle to a running typewriter task
///
/// Dropping the handle cancels the task.
#[derive(Debug)]
pub struct Typewriter {
    commands: mpsc::UnboundedSender<Command>,
    frames: watch::Receiver<Frame>,
    cancel: CancellationToken,
    task: Option<JoinHandle<TypingAnimator>>,
    _guard: DropGuard,
}

impl Typewriter {
    /// Start driving `animator` with an entropy-seeded RNG
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(animator: TypingAnimator) -> Self {
        Self::spawn_with_rng(animator, StdRng::from_entropy())
    }

    /// Start driving `animator` with a caller-supplied RNG
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_with_rng<R>(animator: TypingAnimator, rng: R) -> Self
    where
        R: Rng + Send + 'static,
    {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (frame_tx, frames) = watch::channel(Frame::from_state(animator.state(), 0));
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run(animator, rng, command_rx, frame_tx, cancel.clone()));

        Self {
            commands,
            frames,
            _guard: cancel.clone().drop_guard(),
            cancel,
            task: Some(task),
        }
    }

    /// Hand the typewriter a new phrase list
    pub fn set_phrases(&self, phrases: PhraseList) {
        // Only fails once the task has stopped, when there is nothing to update
        let _ = self.commands.send(Command::SetPhrases(phrases));
    }

    /// Toggle whether new phrase lists restart the animation
    pub fn set_reset_on_phrase_change(&self, enabled: bool) {
        let _ = self
            .commands
            .send(Command::SetResetOnPhraseChange(enabled));
    }

    /// Receiver for published frames
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    /// Most recently published frame
    #[must_use]
    pub fn current(&self) -> Frame {
        self.frames.borrow().clone()
    }

    /// Whether the driving task is still running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the task and wait for it, returning the animator as it was
    /// when the pending tick was cancelled
    pub async fn shutdown(mut self) -> Option<TypingAnimator> {
        self.cancel.cancel();
        let task = self.task.take()?;
        task.await.ok()
    }
}

async fn run<R: Rng + Send>(
    mut animator: TypingAnimator,
    mut rng: R,
    mut commands: mpsc::UnboundedReceiver<Command>,
    frames: watch::Sender<Frame>,
    cancel: CancellationToken,
) -> TypingAnimator {
    let mut published = animator.state();
    let mut seq = 0;
    let mut deadline: Option<Instant> = None;

    loop {
        let at = match deadline {
            Some(at) => at,
            None => {
                let delay = animator.next_delay(&mut rng);
                // Entering a pause is a state change of its own
                publish(&animator, &mut published, &mut seq, &frames);
                trace!(?delay, mode = animator.mode().label(), "tick scheduled");
                let at = Instant::now() + delay;
                deadline = Some(at);
                at
            }
        };

        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                debug!("typewriter cancelled");
                break;
            }

            command = commands.recv() => match command {
                Some(Command::SetPhrases(phrases)) => {
                    let len = phrases.len();
                    if animator.set_phrases(phrases) == PhraseUpdate::Reset {
                        // Drop the pending tick; the next loop schedules afresh
                        deadline = None;
                        debug!(phrases = len, "typewriter reset for new phrase list");
                    } else {
                        debug!(phrases = len, "phrase list adopted");
                    }
                    publish(&animator, &mut published, &mut seq, &frames);
                }
                Some(Command::SetResetOnPhraseChange(enabled)) => {
                    animator.set_reset_on_phrase_change(enabled);
                }
                None => {
                    debug!("typewriter handle gone");
                    break;
                }
            },

            () = tokio::time::sleep_until(at) => {
                deadline = None;
                animator.tick();
                publish(&animator, &mut published, &mut seq, &frames);
            }
        }
    }

    animator
}

fn publish(
    animator: &TypingAnimator,
    published: &mut AnimatorState,
    seq: &mut u64,
    frames: &watch::Sender<Frame>,
) {
    let state = animator.state();
    if state == *published {
        return;
    }
    *seq += 1;
    *published = state.clone();
    frames.send_replace(Frame::from_state(state, *seq));
}
