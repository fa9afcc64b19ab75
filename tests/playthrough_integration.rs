use campusgate::{
    Briefing, Catalog, Category, Event, ImageAsset, Notice, Presenter, RoundError,
    RoundInstance, SelectionMode, SelectionState, Stage, TimeDisplay, Variant, Verdict, Verifier,
    check_full_playthrough, demo_catalog, evaluate,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;

#[derive(Default)]
struct Recorder {
    rounds: Vec<RoundInstance>,
    briefings: Vec<Briefing>,
    selections: Vec<Vec<usize>>,
    verdicts: Vec<Verdict>,
    times: Vec<TimeDisplay>,
    notices: Vec<Notice>,
}

impl Presenter for Recorder {
    fn show_round(&mut self, instance: &RoundInstance, briefing: &Briefing) {
        self.rounds.push(instance.clone());
        self.briefings.push(briefing.clone());
    }

    fn show_selection(&mut self, selection: &SelectionState) {
        self.selections.push(selection.positions().collect());
    }

    fn show_verdict(&mut self, verdict: &Verdict) {
        self.verdicts.push(verdict.clone());
    }

    fn show_time(&mut self, display: &TimeDisplay) {
        self.times.push(display.clone());
    }

    fn alert(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}

fn started(seed: u64, variant: Variant) -> (Verifier<Catalog, StdRng>, Recorder) {
    let mut verifier = Verifier::new(demo_catalog(), StdRng::seed_from_u64(seed), variant);
    let mut recorder = Recorder::default();
    verifier.start(&mut recorder).expect("demo catalog supports round 1");
    (verifier, recorder)
}

fn current(verifier: &Verifier<Catalog, StdRng>) -> RoundInstance {
    verifier
        .session()
        .active()
        .expect("a round is active")
        .instance
        .clone()
}

fn toggle_all(verifier: &mut Verifier<Catalog, StdRng>, recorder: &mut Recorder, positions: &[usize]) {
    for &position in positions {
        verifier
            .handle(Event::Toggle(position), recorder)
            .expect("toggle never fails");
    }
}

fn pass_current(verifier: &mut Verifier<Catalog, StdRng>, recorder: &mut Recorder) {
    let targets = current(verifier).target_positions();
    toggle_all(verifier, recorder, &targets);
    verifier
        .handle(Event::Submit, recorder)
        .expect("next round loads");
}

#[test]
fn three_passes_complete_with_fifty_points_then_restart() {
    let (mut verifier, mut recorder) = started(1, Variant::Timed);

    for _ in 0..3 {
        pass_current(&mut verifier, &mut recorder);
    }

    assert_eq!(
        recorder.notices,
        [
            Notice::RoundPassed {
                round: 1,
                awarded: 5,
                total: 5,
                next: 2
            },
            Notice::RoundPassed {
                round: 2,
                awarded: 15,
                total: 20,
                next: 3
            },
            Notice::Completed { total: 50 },
        ]
    );
    assert_eq!(verifier.session().stage(), Stage::Round(1));
    assert_eq!(verifier.session().points(), 0);
    assert_eq!(recorder.rounds.len(), 4);
    assert_eq!(recorder.rounds[3].round(), 1);
}

#[test]
fn no_identifier_repeats_within_a_playthrough() {
    for seed in 0..20 {
        let (mut verifier, mut recorder) = started(seed, Variant::Untimed);
        for _ in 0..3 {
            pass_current(&mut verifier, &mut recorder);
        }

        let mut seen = HashSet::new();
        for instance in &recorder.rounds[..3] {
            for identifier in instance.identifiers() {
                assert!(seen.insert(identifier.to_string()), "{identifier} repeated");
            }
        }
    }
}

#[test]
fn catalog_too_small_for_level_three_is_caught_before_play() {
    let catalog = Catalog::new(
        (1..=6).map(|i| format!("campus_{i}.jpg")).collect(),
        (1..=12).map(|i| format!("external_{i}.jpg")).collect(),
    )
    .expect("disjoint pools");

    assert_eq!(
        check_full_playthrough(&catalog),
        Err(RoundError::InsufficientAssets {
            category: Category::Target,
            required: 10,
            available: 6,
        })
    );

    // Without the up-front check the same catalog only fails once level 3 is due.
    let mut verifier = Verifier::new(catalog, StdRng::seed_from_u64(4), Variant::Untimed);
    let mut recorder = Recorder::default();
    verifier.start(&mut recorder).expect("level 1 fits");
    pass_current(&mut verifier, &mut recorder);
    let targets = current(&verifier).target_positions();
    toggle_all(&mut verifier, &mut recorder, &targets);

    let error = verifier
        .handle(Event::Submit, &mut recorder)
        .expect_err("level 3 cannot be built");

    assert!(matches!(error, RoundError::InsufficientAssets { required: 6, .. }));
    assert!(matches!(
        recorder.notices.last(),
        Some(Notice::AssetsUnavailable { .. })
    ));
}

#[test]
fn failure_in_round_two_reports_total_then_resets() {
    let (mut verifier, mut recorder) = started(7, Variant::Timed);
    pass_current(&mut verifier, &mut recorder);

    let round_two = current(&verifier);
    let first_target = round_two.target_positions()[0];
    let first_decoy = (0..9)
        .find(|position| !round_two.target_positions().contains(position))
        .expect("round 2 has decoys");
    toggle_all(&mut verifier, &mut recorder, &[first_target, first_decoy]);
    verifier
        .handle(Event::Submit, &mut recorder)
        .expect("round 1 reloads");

    assert_eq!(
        recorder.notices.last(),
        Some(&Notice::RoundFailed {
            round: 2,
            total: 10,
            incorrect: vec![first_decoy],
        })
    );
    assert_eq!(verifier.session().stage(), Stage::Round(1));
    assert_eq!(verifier.session().points(), 0);
    assert_eq!(recorder.briefings.last().map(|briefing| briefing.points), Some(0));
}

#[test]
fn too_few_targets_fails_even_without_decoys() {
    let (mut verifier, mut recorder) = started(9, Variant::Untimed);
    pass_current(&mut verifier, &mut recorder);

    let targets = current(&verifier).target_positions();
    toggle_all(&mut verifier, &mut recorder, &targets[..2]);
    verifier
        .handle(Event::Submit, &mut recorder)
        .expect("round 1 reloads");

    assert_eq!(
        recorder.notices.last(),
        Some(&Notice::RoundFailed {
            round: 2,
            total: 15,
            incorrect: Vec::new(),
        })
    );
}

#[test]
fn round_one_behaves_like_radio_buttons() {
    let (mut verifier, mut recorder) = started(3, Variant::Timed);

    toggle_all(&mut verifier, &mut recorder, &[0, 2]);

    assert_eq!(recorder.selections.last(), Some(&vec![2]));
    let active = verifier.session().active().expect("round 1 active");
    assert_eq!(active.selection.mode(), SelectionMode::Single);
}

#[test]
fn deadline_expiry_resets_without_evaluating() {
    let (mut verifier, mut recorder) = started(5, Variant::Timed);
    toggle_all(&mut verifier, &mut recorder, &[1]);

    for _ in 0..30 {
        verifier
            .handle(Event::Tick, &mut recorder)
            .expect("round 1 reloads after expiry");
    }

    assert!(recorder.verdicts.is_empty());
    assert_eq!(
        recorder.notices,
        [Notice::TimeExpired { round: 1, total: 0 }]
    );
    assert_eq!(verifier.session().stage(), Stage::Round(1));
    assert_eq!(verifier.session().points(), 0);
    assert_eq!(recorder.rounds.len(), 2);
    assert!(verifier.session().active().expect("fresh round").selection.is_empty());
    assert_eq!(recorder.times.iter().filter(|time| time.text == "00:00").count(), 1);
}

#[test]
fn expiry_in_later_round_keeps_only_earlier_points() {
    let (mut verifier, mut recorder) = started(12, Variant::Timed);
    pass_current(&mut verifier, &mut recorder);

    let targets = current(&verifier).target_positions();
    toggle_all(&mut verifier, &mut recorder, &targets);
    for _ in 0..60 {
        verifier.handle(Event::Tick, &mut recorder).expect("tick");
    }

    assert_eq!(
        recorder.notices.last(),
        Some(&Notice::TimeExpired { round: 2, total: 5 })
    );
    assert_eq!(recorder.verdicts.len(), 1);
}

#[test]
fn timer_turns_urgent_in_final_fifth() {
    let (mut verifier, mut recorder) = started(2, Variant::Timed);

    for _ in 0..25 {
        verifier.handle(Event::Tick, &mut recorder).expect("tick");
    }

    let last = recorder.times.last().expect("time shown");
    assert_eq!(last.text, "00:05");
    assert!(last.urgent);
    assert!(!recorder.times[recorder.times.len() - 2].urgent);
}

#[test]
fn evaluator_matches_documented_examples() {
    let cells: Vec<ImageAsset> = (0..4)
        .map(|position| {
            let category = if position == 2 {
                Category::Target
            } else {
                Category::Decoy
            };
            ImageAsset::new(format!("cell_{position}.jpg"), category)
        })
        .collect();
    let instance = RoundInstance::from_layout(1, cells).expect("valid layout");

    let mut single = SelectionState::for_round(&instance);
    single.toggle(2).expect("in range");
    let verdict = evaluate(&instance, &single);
    assert!(verdict.passed);
    assert_eq!(verdict.points_awarded, 5);
    assert!(verdict.incorrect_positions.is_empty());

    let mut both = SelectionState::new(SelectionMode::Multiple, 4);
    both.toggle(2).expect("in range");
    both.toggle(3).expect("in range");
    let verdict = evaluate(&instance, &both);
    assert!(!verdict.passed);
    assert_eq!(verdict.points_awarded, 5);
    assert_eq!(verdict.incorrect_positions, [3]);
}
