use sprite_animation_core::{
    AnimationHost, AnimationManager, AnimationNode, CurveType, Direction, EasingCurve, GridCall,
    LoopComponent, LoopMode, NodeId, PlaybackState, PropertyBinding, PropertyHandle, ScriptCall,
    SpriteId,
};

#[derive(Default)]
struct RecordingHost {
    writes: Vec<(PropertyHandle, f32)>,
}

impl AnimationHost for RecordingHost {
    fn set_property(&mut self, binding: PropertyBinding, value: f32) {
        self.writes.push((binding.property, value));
    }

    fn deform_grid(&mut self, _call: &GridCall<'_>) {}

    fn call_script(&mut self, _call: &ScriptCall) -> Result<(), String> {
        Ok(())
    }
}

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn binding(property: u32) -> PropertyBinding {
    PropertyBinding {
        sprite: SpriteId(1),
        property: PropertyHandle(property),
    }
}

fn mk_leaf(m: &mut AnimationManager, parent: NodeId, property: u32, mode: LoopMode) -> NodeId {
    m.add_property_animation(
        parent,
        &format!("p{property}"),
        EasingCurve::new(CurveType::Linear).with_loop_mode(mode),
        binding(property),
    )
    .unwrap()
}

fn state(m: &AnimationManager, id: NodeId) -> PlaybackState {
    m.node(id).unwrap().state()
}

fn time(m: &AnimationManager, id: NodeId) -> f32 {
    m.node(id).unwrap().as_leaf().unwrap().curve.time()
}

#[test]
fn play_starts_every_child() {
    let mut m = AnimationManager::default();
    let par = m.add_animation(m.root(), AnimationNode::parallel("par")).unwrap();
    let a = mk_leaf(&mut m, par, 0, LoopMode::Disabled);
    let b = mk_leaf(&mut m, par, 1, LoopMode::Rewind);
    m.play(par).unwrap();

    assert_eq!(state(&m, par), PlaybackState::Playing);
    assert_eq!(state(&m, a), PlaybackState::Playing);
    assert_eq!(state(&m, b), PlaybackState::Playing);
}

#[test]
fn group_keeps_playing_after_children_finish() {
    let mut m = AnimationManager::default();
    let mut host = RecordingHost::default();
    let par = m.add_animation(m.root(), AnimationNode::parallel("par")).unwrap();
    let a = mk_leaf(&mut m, par, 0, LoopMode::Disabled);
    let b = mk_leaf(&mut m, par, 1, LoopMode::Rewind);
    m.play(par).unwrap();

    for _ in 0..3 {
        m.update(0.5, &mut host);
    }
    assert_eq!(state(&m, a), PlaybackState::Stopped);
    approx(time(&m, a), 1.0, 0.0);
    assert_eq!(state(&m, b), PlaybackState::Playing);
    assert_eq!(state(&m, par), PlaybackState::Playing);
}

#[test]
fn resume_only_touches_paused_children() {
    let mut m = AnimationManager::default();
    let mut host = RecordingHost::default();
    let par = m.add_animation(m.root(), AnimationNode::parallel("par")).unwrap();
    let a = mk_leaf(&mut m, par, 0, LoopMode::Rewind);
    let b = mk_leaf(&mut m, par, 1, LoopMode::Rewind);
    m.play(par).unwrap();
    m.update(0.25, &mut host);

    m.stop(b).unwrap();
    m.pause(par).unwrap();
    assert_eq!(state(&m, par), PlaybackState::Paused);
    assert_eq!(state(&m, a), PlaybackState::Paused);
    assert_eq!(state(&m, b), PlaybackState::Stopped);

    m.play(par).unwrap();
    assert_eq!(state(&m, a), PlaybackState::Playing);
    assert_eq!(state(&m, b), PlaybackState::Stopped);
    // resuming keeps the cursor
    approx(time(&m, a), 0.25, 1e-6);
}

#[test]
fn pause_from_stopped_is_ignored() {
    let mut m = AnimationManager::default();
    let par = m.add_animation(m.root(), AnimationNode::parallel("par")).unwrap();
    let a = mk_leaf(&mut m, par, 0, LoopMode::Disabled);
    m.pause(par).unwrap();
    assert_eq!(state(&m, par), PlaybackState::Stopped);
    assert_eq!(state(&m, a), PlaybackState::Stopped);
}

#[test]
fn start_delay_holds_children() {
    let mut m = AnimationManager::default();
    let mut host = RecordingHost::default();
    let par = m
        .add_animation(m.root(), AnimationNode::parallel("par").with_delay(1.0))
        .unwrap();
    let a = mk_leaf(&mut m, par, 0, LoopMode::Disabled);
    m.play(par).unwrap();

    m.update(0.5, &mut host);
    m.update(0.5, &mut host);
    approx(time(&m, a), 0.0, 0.0);
    assert!(host.writes.is_empty());

    m.update(0.5, &mut host);
    approx(time(&m, a), 0.5, 1e-6);
    assert_eq!(host.writes, vec![(PropertyHandle(0), 0.5)]);
}

#[test]
fn leaf_loop_delay_pauses_between_cycles() {
    let mut m = AnimationManager::default();
    let mut host = RecordingHost::default();
    let a = m
        .add_property_animation(
            m.root(),
            "a",
            EasingCurve::new(CurveType::Linear)
                .with_loop(LoopComponent::new(LoopMode::Rewind).with_delay(0.5)),
            binding(0),
        )
        .unwrap();
    m.play(a).unwrap();

    for _ in 0..3 {
        m.update(0.4, &mut host);
    }
    approx(time(&m, a), 0.2, 1e-5);

    m.update(0.4, &mut host);
    approx(time(&m, a), 0.6, 1e-5);
    let writes = host.writes.len();

    m.update(0.4, &mut host);
    m.update(0.4, &mut host);
    approx(time(&m, a), 0.6, 1e-5);
    assert_eq!(host.writes.len(), writes);
    assert_eq!(state(&m, a), PlaybackState::Playing);
}

#[test]
fn leaf_start_delay_runs_before_first_step() {
    let mut m = AnimationManager::default();
    let mut host = RecordingHost::default();
    let a = m
        .add_animation(
            m.root(),
            AnimationNode::leaf(
                "a",
                sprite_animation_core::CurveAnimation::property(
                    EasingCurve::new(CurveType::Linear),
                    binding(0),
                ),
            )
            .with_delay(0.5),
        )
        .unwrap();
    m.play(a).unwrap();

    m.update(0.5, &mut host);
    approx(time(&m, a), 0.0, 0.0);
    m.update(0.5, &mut host);
    approx(time(&m, a), 0.5, 1e-6);

    // stop resets the counter so the next play waits again
    m.stop(a).unwrap();
    m.play(a).unwrap();
    m.update(0.5, &mut host);
    approx(time(&m, a), 0.0, 0.0);
}

#[test]
fn stop_leaves_children_mirrored_when_group_runs_backward() {
    let mut m = AnimationManager::default();
    let mut host = RecordingHost::default();
    let par = m.add_animation(m.root(), AnimationNode::parallel("par")).unwrap();
    m.node_mut(par).unwrap().as_group_mut().unwrap().looping =
        LoopComponent::new(LoopMode::Disabled).with_direction(Direction::Backward);
    let a = mk_leaf(&mut m, par, 0, LoopMode::Rewind);
    m.play(par).unwrap();
    m.update(0.25, &mut host);

    m.stop(par).unwrap();
    let leaf = m.node(a).unwrap().as_leaf().unwrap();
    assert_eq!(state(&m, a), PlaybackState::Stopped);
    assert_eq!(leaf.curve.looping.direction, Direction::Backward);
    assert_eq!(leaf.curve.time(), 0.0);
}
