#![cfg(feature = "derive")]

use fmbt::*;

#[derive(State, Debug, Clone, PartialEq)]
struct PlayerState {
    playing: bool,
    song: u32,
}

#[derive(State, Debug, Clone, PartialEq)]
struct Point(i32, i32);

#[derive(State, Debug, Clone, PartialEq)]
struct Idle;

#[derive(State, Debug, Clone, PartialEq)]
enum Door {
    Open,
    Closed { locked: bool },
    Ajar(u8),
}

#[derive(State, Debug, Clone, PartialEq)]
struct Labelled<T: std::fmt::Debug + Clone> {
    label: String,
    value: T,
}

#[test]
fn test_named_struct_rendering() {
    let state = PlayerState {
        playing: false,
        song: 1,
    };
    assert_eq!(state.render(), "{playing:false,song:1}");
}

#[test]
fn test_tuple_and_unit_struct_rendering() {
    assert_eq!(Point(-1, 2).render(), "Point(-1,2)");
    assert_eq!(Idle.render(), "Idle");
}

#[test]
fn test_enum_rendering() {
    assert_eq!(Door::Open.render(), "Open");
    assert_eq!(Door::Closed { locked: true }.render(), "Closed{locked:true}");
    assert_eq!(Door::Ajar(30).render(), "Ajar(30)");
}

#[test]
fn test_generic_struct_rendering() {
    let state = Labelled {
        label: "n".to_string(),
        value: 3u8,
    };
    // strings render with their Debug quotes
    assert_eq!(state.render(), "{label:\"n\",value:3}");
}

#[test]
fn test_derived_states_drive_coverage() {
    let mut model = Model::new();
    model.register(|door: &Door| match door {
        Door::Open => on_action("close").to_state(Door::Closed { locked: false }),
        Door::Closed { locked: false } => when(
            true,
            [
                on_action("open").to_state(Door::Open),
                on_action("lock").to_state(Door::Closed { locked: true }),
            ],
        ),
        Door::Closed { locked: true } => on_action("unlock").to_state(Door::Closed { locked: false }),
        Door::Ajar(_) => Vec::new(),
    });

    let mut coverer = Coverer::new();
    coverer.cover_states();
    let (path, stats) = coverer.best_path(&model, &Door::Open, 4).unwrap();
    assert_eq!(stats.max_increase, 3);
    assert_eq!(
        path.prefix(stats.max_step + 1).to_string(),
        "[Open--close->Closed{locked:false}] [Closed{locked:false}--lock->Closed{locked:true}]"
    );
}
