//! Main Application
//!
//! The App struct runs the terminal landing page:
//! - Event loop (keyboard, mouse, resize)
//! - Typewriter tagline driven by a [`Typewriter`] task
//! - Waitlist form revealed by hovering the logo
//! - Submissions posted on spawned tasks, results fed back over a channel
//!
//! # Layout
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │                                          │
//! │            ╔═╗╦╔╗╔╔═╗╔╗╔╔╦╗╦╔═╗           │  <- hover target
//! │                                          │
//! │    From idea to conviction in min|       │  <- typewriter
//! │                                          │
//! │        Name    Ada_                      │  <- form (when shown)
//! │        Email   Your email                │
//! │                                          │
//! │ Enter to join | Tab next field | Esc quit│  <- status
//! └──────────────────────────────────────────┘
//! ```

use anyhow::Context;
use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::Style;
use ratatui::Terminal;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use landing_core::{Frame, LandingConfig, PhraseList, Typewriter, TypingAnimator};

use crate::client::WaitlistClient;
use crate::form::WaitlistForm;
use crate::theme;
use crate::widgets::{centered, FormView, Logo, Tagline};

/// Rows reserved for the tagline so wrapping does not shift the form
const TAGLINE_ROWS: u16 = 2;

/// How a spawned submission ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server stored the entry
    Joined,
    /// The request failed or was rejected
    Failed,
}

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Tagline ===
    /// Phrases cycled while the form is hidden
    taglines: PhraseList,
    /// Phrases cycled while the form is shown
    waitlist_taglines: PhraseList,
    /// Handle to the typewriter task
    typewriter: Typewriter,
    /// Latest typewriter frame
    frames: watch::Receiver<Frame>,

    // === Waitlist ===
    /// Form state
    form: WaitlistForm,
    /// Endpoint client
    client: WaitlistClient,
    /// Results from spawned submissions
    outcomes_tx: mpsc::UnboundedSender<SubmitOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<SubmitOutcome>,

    // === Layout ===
    /// Where the logo was last drawn (hover target)
    logo_area: Rect,
    /// Terminal size
    size: (u16, u16),
}

impl App {
    /// Create a new App instance
    ///
    /// Must be called from within a tokio runtime; the typewriter starts
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if a phrase list is empty or the HTTP client cannot
    /// be built.
    pub fn new(config: &LandingConfig) -> anyhow::Result<Self> {
        let taglines = config
            .typewriter
            .tagline_phrases()
            .context("No taglines configured")?;
        let waitlist_taglines = config
            .typewriter
            .waitlist_phrases()
            .context("No waitlist tagline configured")?;

        let animator = TypingAnimator::new(
            taglines.clone(),
            config.typewriter.reset_on_phrase_change,
        )
        .with_timing(config.typewriter.timing.clone());
        let typewriter = Typewriter::spawn(animator);
        let frames = typewriter.subscribe();

        let client = WaitlistClient::new(&config.client)?;
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();

        info!(
            taglines = taglines.len(),
            endpoint = client.url(),
            "Landing page ready"
        );

        Ok(Self {
            running: true,
            taglines,
            waitlist_taglines,
            typewriter,
            frames,
            form: WaitlistForm::new(),
            client,
            outcomes_tx,
            outcomes_rx,
            logo_area: Rect::default(),
            size: (0, 0),
        })
    }

    /// Main event loop
    ///
    /// Redraws whenever the typewriter publishes a frame, a terminal event
    /// arrives, or a submission finishes.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing to the terminal fails.
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let size = terminal.size()?;
        self.size = (size.width, size.height);

        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => warn!(error = %e, "Terminal event error"),
                    None => {
                        info!("Terminal event stream closed");
                        self.running = false;
                    }
                },

                Some(outcome) = self.outcomes_rx.recv() => self.apply_outcome(outcome),

                changed = self.frames.changed() => {
                    if changed.is_err() {
                        warn!("Typewriter stopped");
                        self.running = false;
                    }
                }
            }

            self.render(terminal)?;
        }

        Ok(())
    }

    /// Apply one terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.handle_resize(w, h),
            _ => {}
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            // Reveal the form, then cycle fields
            KeyCode::Tab | KeyCode::BackTab => {
                if self.form.show() {
                    self.sync_phrases();
                } else {
                    self.form.focus_next();
                }
            }

            KeyCode::Enter => self.submit(),

            // Typing
            KeyCode::Char(c) if self.form.is_visible() => self.form.push(c),
            KeyCode::Backspace if self.form.is_visible() => self.form.backspace(),

            _ => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(
            mouse.kind,
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_)
        ) {
            return;
        }

        let over_logo = self
            .logo_area
            .contains(Position::new(mouse.column, mouse.row));
        if self.form.set_hovered(over_logo) {
            debug!(visible = self.form.is_visible(), "Form visibility changed");
            self.sync_phrases();
        }
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
    }

    /// Point the typewriter at the phrase list matching form visibility
    fn sync_phrases(&self) {
        let phrases = if self.form.is_visible() {
            &self.waitlist_taglines
        } else {
            &self.taglines
        };
        self.typewriter.set_phrases(phrases.clone());
    }

    /// Post the form on a background task if it has content
    fn submit(&mut self) {
        let Some(submission) = self.form.submission() else {
            return;
        };
        self.form.set_submitting(true);

        let client = self.client.clone();
        let outcomes = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let outcome = match client.submit(&submission).await {
                Ok(reply) => {
                    info!(message = %reply.message, "Joined waitlist");
                    SubmitOutcome::Joined
                }
                Err(e) => {
                    warn!(error = %e, "Waitlist submission failed");
                    SubmitOutcome::Failed
                }
            };
            // App gone means nobody is waiting for the result
            let _ = outcomes.send(outcome);
        });
    }

    /// Apply a finished submission
    fn apply_outcome(&mut self, outcome: SubmitOutcome) {
        match outcome {
            SubmitOutcome::Joined => {
                let was_visible = self.form.is_visible();
                self.form.reset();
                if was_visible {
                    self.sync_phrases();
                }
            }
            SubmitOutcome::Failed => self.form.set_submitting(false),
        }
    }

    /// Wait for the next spawned submission to finish and apply it
    pub async fn settle_submission(&mut self) -> Option<SubmitOutcome> {
        let outcome = self.outcomes_rx.recv().await?;
        self.apply_outcome(outcome);
        Some(outcome)
    }

    /// Render the UI
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal backend fails.
    pub fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let area = frame.area();
        let [body, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

        let logo_rows = Logo::HEIGHT + 1;
        let content_height = logo_rows + 1 + TAGLINE_ROWS + 1 + FormView::HEIGHT;
        let top = body.y + body.height.saturating_sub(content_height) / 2;
        let content = Rect::new(
            body.x,
            top,
            body.width,
            content_height.min(body.bottom().saturating_sub(top)),
        );

        let [logo_row, _, tagline_row, _, form_row] = Layout::vertical([
            Constraint::Length(logo_rows),
            Constraint::Length(1),
            Constraint::Length(TAGLINE_ROWS),
            Constraint::Length(1),
            Constraint::Length(FormView::HEIGHT),
        ])
        .areas(content);

        self.logo_area = Logo::bounds(logo_row);
        frame.render_widget(Logo::new(self.form.is_hovered()), logo_row);

        let text = self.frames.borrow_and_update().text.clone();
        frame.render_widget(Tagline::new(&text), tagline_row);

        if self.form.is_visible() {
            frame.render_widget(
                FormView::new(&self.form),
                centered(form_row, FormView::WIDTH, FormView::HEIGHT),
            );
        }

        self.draw_status(frame, status);
    }

    fn draw_status(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (text, color) = if self.form.is_submitting() {
            (" Submitting...", theme::PENDING_AMBER)
        } else if self.form.is_visible() {
            (
                " Enter to join | Tab next field | Esc to quit",
                theme::DIM_GRAY,
            )
        } else {
            (
                " Hover the logo or press Tab to join the waitlist | Esc to quit",
                theme::DIM_GRAY,
            )
        };
        frame
            .buffer_mut()
            .set_stringn(area.x, area.y, text, usize::from(area.width), Style::default().fg(color));
    }

    /// Whether the event loop should keep going
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Form state
    #[must_use]
    pub fn form(&self) -> &WaitlistForm {
        &self.form
    }

    /// Where the logo was last drawn
    #[must_use]
    pub fn logo_area(&self) -> Rect {
        self.logo_area
    }

    /// Receiver for typewriter frames
    #[must_use]
    pub fn frames(&self) -> watch::Receiver<Frame> {
        self.typewriter.subscribe()
    }

    /// Last known terminal size
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        self.size
    }
}
