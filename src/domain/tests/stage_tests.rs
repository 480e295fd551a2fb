use super::*;
use proptest::prelude::*;

/// The two-stage track used throughout the dashboard docs.
fn sample_track() -> StageTrack {
    StageTrack::new(vec![
        Stage {
            name: "Pre-Incubation".to_string(),
            order: 1,
            substages: vec![
                Substage { name: "Idea".to_string(), order: 1 },
                Substage { name: "Concept".to_string(), order: 2 },
                Substage { name: "Research".to_string(), order: 3 },
            ],
        },
        Stage {
            name: "Incubation".to_string(),
            order: 2,
            substages: vec![
                Substage { name: "BMC".to_string(), order: 1 },
                Substage { name: "Plan".to_string(), order: 2 },
                Substage { name: "Pitch".to_string(), order: 3 },
            ],
        },
    ])
}

fn state_at(track: &StageTrack, flat_index: usize) -> ProgressionState {
    ProgressionState {
        flat_index,
        status: StageStatus::InProgress,
        progress_percent: track.progress_percent(flat_index),
    }
}

fn activity(name: &str, status: ActivityStatus, required: bool) -> Activity {
    Activity {
        id: format!("act-{name}"),
        name: name.to_string(),
        status,
        required,
    }
}

fn permissive() -> PromotionPolicy {
    PromotionPolicy {
        require_completed_activities: false,
    }
}

#[test]
fn test_flattened_steps_and_resolution() {
    let track = sample_track();
    assert_eq!(track.total_flattened_steps(), 6);

    let (stage, substage) = track.step_at(0).unwrap();
    assert_eq!(stage.name, "Pre-Incubation");
    assert_eq!(substage.name, "Idea");

    let (stage, substage) = track.step_at(3).unwrap();
    assert_eq!(stage.name, "Incubation");
    assert_eq!(substage.name, "BMC");

    let (stage, substage) = track.step_at(5).unwrap();
    assert_eq!(stage.name, "Incubation");
    assert_eq!(substage.name, "Pitch");

    assert!(track.step_at(6).is_none());
}

#[test]
fn test_construction_sorts_by_declared_order() {
    let track = StageTrack::new(vec![
        Stage {
            name: "Second".to_string(),
            order: 2,
            substages: vec![
                Substage { name: "B2".to_string(), order: 2 },
                Substage { name: "B1".to_string(), order: 1 },
            ],
        },
        Stage {
            name: "First".to_string(),
            order: 1,
            substages: vec![Substage { name: "A1".to_string(), order: 1 }],
        },
    ]);

    let (stage, substage) = track.step_at(0).unwrap();
    assert_eq!(stage.name, "First");
    assert_eq!(substage.name, "A1");
    let (_, substage) = track.step_at(1).unwrap();
    assert_eq!(substage.name, "B1");
}

#[test]
fn test_progress_percent_is_floored() {
    let track = sample_track();
    assert_eq!(track.progress_percent(0), 0);
    assert_eq!(track.progress_percent(2), 33);
    assert_eq!(track.progress_percent(3), 50);
    assert_eq!(track.progress_percent(5), 83);
}

#[test]
fn test_terminal_detection() {
    let track = sample_track();
    assert!(!track.is_terminal(0));
    assert!(!track.is_terminal(4));
    assert!(track.is_terminal(5));
}

#[test]
fn test_promote_advances_within_stage() {
    let track = sample_track();
    let state = state_at(&track, 0);

    let promotion = track.promote(&state, &[], &permissive()).unwrap();
    assert_eq!(promotion.next.flat_index, 1);
    assert_eq!(promotion.next.status, StageStatus::InProgress);
    assert_eq!(promotion.next.progress_percent, 16);
    assert_eq!(promotion.entered_stage, None);
}

#[test]
fn test_promote_crosses_stage_boundary() {
    // Research (flat 2, 33%) -> BMC (flat 3, 50%), entering Incubation.
    let track = sample_track();
    let state = state_at(&track, 2);
    assert_eq!(state.progress_percent, 33);

    let promotion = track.promote(&state, &[], &permissive()).unwrap();
    assert_eq!(promotion.next.flat_index, 3);
    assert_eq!(promotion.next.progress_percent, 50);
    assert_eq!(promotion.entered_stage.as_deref(), Some("Incubation"));
}

#[test]
fn test_promote_at_terminal_is_rejected() {
    let track = sample_track();
    let state = state_at(&track, 5);

    let err = track.promote(&state, &[], &permissive()).unwrap_err();
    assert_eq!(err, PromotionError::AlreadyAtFinalStage);
    // The input state is untouched by a rejection.
    assert_eq!(state.flat_index, 5);
}

#[test]
fn test_promote_requires_completed_activities() {
    let track = sample_track();
    let state = state_at(&track, 1);
    let activities = vec![
        activity("Customer interviews", ActivityStatus::Completed, true),
        activity("Market sizing", ActivityStatus::Pending, true),
        activity("Logo draft", ActivityStatus::InProgress, false),
    ];

    let err = track
        .promote(&state, &activities, &PromotionPolicy::default())
        .unwrap_err();
    match err {
        PromotionError::ActivitiesIncomplete { missing } => {
            assert_eq!(missing, vec!["Market sizing".to_string()]);
        }
        other => panic!("Expected ActivitiesIncomplete, got {other:?}"),
    }
}

#[test]
fn test_promote_ignores_activities_when_policy_is_off() {
    let track = sample_track();
    let state = state_at(&track, 1);
    let activities = vec![activity("Market sizing", ActivityStatus::Pending, true)];

    let promotion = track.promote(&state, &activities, &permissive()).unwrap();
    assert_eq!(promotion.next.flat_index, 2);
}

#[test]
fn test_promote_with_all_required_completed() {
    let track = sample_track();
    let state = state_at(&track, 1);
    let activities = vec![
        activity("Customer interviews", ActivityStatus::Completed, true),
        activity("Logo draft", ActivityStatus::Pending, false),
    ];

    let promotion = track
        .promote(&state, &activities, &PromotionPolicy::default())
        .unwrap();
    assert_eq!(promotion.next.flat_index, 2);
}

proptest! {
    /// Promotion never skips, never regresses, and keeps the percentage
    /// non-decreasing over any full walk of a random track.
    #[test]
    fn prop_promotion_is_monotonic(substage_counts in prop::collection::vec(1usize..4, 1..4)) {
        let stages = substage_counts
            .iter()
            .enumerate()
            .map(|(i, count)| Stage {
                name: format!("Stage {i}"),
                order: i as u32,
                substages: (0..*count)
                    .map(|j| Substage { name: format!("Sub {i}.{j}"), order: j as u32 })
                    .collect(),
            })
            .collect();
        let track = StageTrack::new(stages);
        let total = track.total_flattened_steps();

        let mut state = ProgressionState {
            flat_index: 0,
            status: StageStatus::NotStarted,
            progress_percent: 0,
        };
        let mut steps = 0usize;
        loop {
            match track.promote(&state, &[], &permissive()) {
                Ok(promotion) => {
                    prop_assert_eq!(promotion.next.flat_index, state.flat_index + 1);
                    prop_assert!(promotion.next.progress_percent >= state.progress_percent);
                    state = promotion.next;
                    steps += 1;
                }
                Err(PromotionError::AlreadyAtFinalStage) => break,
                Err(other) => prop_assert!(false, "unexpected promotion failure: {:?}", other),
            }
        }
        prop_assert_eq!(steps, total - 1);
        prop_assert!(track.is_terminal(state.flat_index));
    }
}
