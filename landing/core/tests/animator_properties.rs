//! Property tests for the typing animator
//!
//! Drives the pure state machine by hand over arbitrary phrase lists and
//! checks the invariants that must hold after every tick.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use landing_core::{Mode, PhraseList, TypingAnimator};

fn phrase_lists() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z éüß]{0,12}", 1..6)
}

proptest! {
    #[test]
    fn display_is_always_a_prefix_of_current_phrase(
        list in phrase_lists(),
        ticks in 0usize..400,
        seed in any::<u64>(),
    ) {
        let mut animator = TypingAnimator::new(PhraseList::new(list).unwrap(), false);
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..ticks {
            animator.next_delay(&mut rng);
            animator.tick();

            let phrase = animator.current_phrase();
            prop_assert!(phrase.starts_with(animator.display_text()));
            prop_assert!(animator.display_text().len() <= phrase.len());
            prop_assert!(animator.index() < animator.phrases().len());
        }
    }

    #[test]
    fn each_tick_moves_one_character(
        list in phrase_lists(),
        ticks in 0usize..400,
    ) {
        let mut animator = TypingAnimator::new(PhraseList::new(list).unwrap(), false);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..ticks {
            animator.next_delay(&mut rng);
            let mode = animator.mode();
            let before = animator.display_text().chars().count();
            animator.tick();
            let after = animator.display_text().chars().count();

            match mode {
                Mode::Typing => prop_assert_eq!(after, before + 1),
                Mode::Erasing => prop_assert_eq!(after + 1, before),
                Mode::Paused { .. } => prop_assert_eq!(after, before),
            }
        }
    }

    #[test]
    fn index_advances_by_one_per_cycle(list in phrase_lists()) {
        let len = list.len();
        let mut animator = TypingAnimator::new(PhraseList::new(list).unwrap(), false);
        let mut rng = StdRng::seed_from_u64(5);

        let mut seen = vec![animator.index()];
        // Enough ticks for every phrase to be typed and erased at least once
        for _ in 0..(len * 40) {
            let before = animator.index();
            animator.next_delay(&mut rng);
            animator.tick();
            if animator.index() != before {
                prop_assert_eq!(animator.index(), (before + 1) % len);
                seen.push(animator.index());
            }
        }

        if len == 1 {
            prop_assert!(seen.iter().all(|&i| i == 0));
        }
    }

    #[test]
    fn phrase_change_without_reset_keeps_invariants(
        first in phrase_lists(),
        second in phrase_lists(),
        warmup in 0usize..60,
    ) {
        let mut animator = TypingAnimator::new(PhraseList::new(first).unwrap(), false);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..warmup {
            animator.next_delay(&mut rng);
            animator.tick();
        }

        let typed = animator.display_text().chars().count();
        let mode = animator.mode();
        animator.set_phrases(PhraseList::new(second).unwrap());
        prop_assert!(animator.index() < animator.phrases().len());
        prop_assert!(animator.current_phrase().starts_with(animator.display_text()));
        prop_assert_eq!(animator.mode(), mode);
        prop_assert_eq!(
            animator.display_text().chars().count(),
            typed.min(animator.current_phrase().chars().count())
        );

        for _ in 0..100 {
            animator.next_delay(&mut rng);
            animator.tick();
            prop_assert!(animator.current_phrase().starts_with(animator.display_text()));
        }
    }
}
