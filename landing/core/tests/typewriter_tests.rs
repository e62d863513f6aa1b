//! Typewriter driver tests
//!
//! These run the real driver task on a paused tokio clock, so delays are
//! exact and nothing actually sleeps.

use std::time::Duration;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;
use tokio::time::{timeout, Instant};

use landing_core::{Frame, Mode, PhraseList, Typewriter, TypingAnimator};

fn phrases(items: &[&str]) -> PhraseList {
    PhraseList::new(items.iter().copied()).unwrap()
}

fn spawn(items: &[&str], reset: bool) -> Typewriter {
    Typewriter::spawn_with_rng(
        TypingAnimator::new(phrases(items), reset),
        StdRng::seed_from_u64(7),
    )
}

/// Wait until a frame satisfies `pred` and return it
async fn wait_for<F>(frames: &mut watch::Receiver<Frame>, pred: F) -> Frame
where
    F: Fn(&Frame) -> bool,
{
    timeout(Duration::from_secs(30), async {
        loop {
            {
                let frame = frames.borrow_and_update();
                if pred(&frame) {
                    return frame.clone();
                }
            }
            frames.changed().await.unwrap();
        }
    })
    .await
    .expect("frame never arrived")
}

#[tokio::test(start_paused = true)]
async fn test_single_phrase_text_sequence() {
    let tw = spawn(&["Hi"], false);
    let mut frames = tw.subscribe();

    let mut texts = vec![frames.borrow_and_update().text.clone()];
    while texts.len() < 6 {
        frames.changed().await.unwrap();
        let text = frames.borrow_and_update().text.clone();
        if texts.last() != Some(&text) {
            texts.push(text);
        }
    }

    assert_eq!(texts, vec!["", "H", "Hi", "H", "", "H"]);
    assert_eq!(tw.current().index, 0);
}

#[tokio::test(start_paused = true)]
async fn test_pause_holds_full_phrase() {
    let tw = spawn(&["Go"], false);
    let mut frames = tw.subscribe();

    wait_for(&mut frames, |f| f.text == "Go").await;
    let paused = wait_for(&mut frames, |f| matches!(f.mode, Mode::Paused { .. })).await;
    let start = Instant::now();

    let erasing = wait_for(&mut frames, |f| f.mode == Mode::Erasing).await;
    assert_eq!(paused.text, "Go");
    assert_eq!(erasing.text, "Go");
    assert_eq!(start.elapsed(), Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn test_new_phrase_list_resets_mid_animation() {
    let tw = spawn(&["A", "B"], true);
    let mut frames = tw.subscribe();

    // "A" typed; the 1500 ms pause is now pending
    wait_for(&mut frames, |f| f.text == "A").await;

    tw.set_phrases(phrases(&["C", "D"]));
    let reset = wait_for(&mut frames, |f| f.text.is_empty()).await;
    let start = Instant::now();
    assert_eq!(reset.index, 0);
    assert_eq!(reset.mode, Mode::Typing);

    // The stale pause is gone: the next change is a fresh keystroke
    frames.changed().await.unwrap();
    let next = frames.borrow_and_update().clone();
    assert_eq!(next.text, "C");
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(50) && elapsed < Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_same_shape_list_does_not_reset() {
    let tw = spawn(&["A", "B"], true);
    let mut frames = tw.subscribe();

    let typed = wait_for(&mut frames, |f| f.text == "A").await;
    tw.set_phrases(phrases(&["A", "C"]));
    tokio::task::yield_now().await;
    assert_eq!(tw.current().text, typed.text);

    // The cycle carries on into the adopted second phrase
    let second = wait_for(&mut frames, |f| f.index == 1 && !f.text.is_empty()).await;
    assert_eq!(second.text, "C");
}

#[tokio::test(start_paused = true)]
async fn test_same_shape_list_keeps_progress_in_later_phrase() {
    let tw = spawn(&["Alpha", "Bravo"], true);
    let mut frames = tw.subscribe();

    wait_for(&mut frames, |f| f.index == 1 && f.text == "Bra").await;
    tw.set_phrases(phrases(&["Alpha", "Charlie"]));
    tokio::task::yield_now().await;

    let adopted = tw.current();
    assert_eq!(adopted.index, 1);
    assert_eq!(adopted.text, "Cha");
    assert_eq!(adopted.mode, Mode::Typing);

    let next = wait_for(&mut frames, |f| f.text != "Cha").await;
    assert_eq!(next.text, "Char");
}

#[tokio::test(start_paused = true)]
async fn test_reset_disabled_keeps_progress() {
    let tw = spawn(&["Hello"], false);
    let mut frames = tw.subscribe();

    wait_for(&mut frames, |f| f.text == "Hel").await;
    tw.set_phrases(phrases(&["Help", "Other"]));
    let adopted = wait_for(&mut frames, |f| f.text == "Hel" || f.text == "Help").await;
    assert_eq!(adopted.index, 0);
}

#[tokio::test(start_paused = true)]
async fn test_toggle_reset_at_runtime() {
    let tw = spawn(&["A", "B"], false);
    let mut frames = tw.subscribe();
    wait_for(&mut frames, |f| f.text == "A").await;

    tw.set_reset_on_phrase_change(true);
    tw.set_phrases(phrases(&["X"]));
    let frame = wait_for(&mut frames, |f| f.text.is_empty()).await;
    assert_eq!(frame.index, 0);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_updates() {
    let tw = spawn(&["Hello"], false);
    let mut frames = tw.subscribe();
    wait_for(&mut frames, |f| f.text == "H").await;

    drop(tw);
    let last = frames.borrow().clone();
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert!(frames.changed().await.is_err());
    assert_eq!(frames.borrow().text, last.text);
}
