use chibi::{
    Avatar, AvatarConfig, EyePose, HoverTarget, LayerKind, MotionPreference, Point, PointerSample,
    SurfaceBounds, Vec2,
};

fn bounds() -> SurfaceBounds {
    SurfaceBounds::new(Point::new(100.0, 50.0), 400.0, 400.0).unwrap()
}

fn ready_avatar() -> Avatar {
    let mut avatar = Avatar::new(AvatarConfig {
        already_introduced: true,
        motion: MotionPreference::Full,
    })
    .unwrap();
    avatar.mount(bounds());
    avatar
}

fn offset_of(avatar: &Avatar, kind: LayerKind) -> Vec2 {
    avatar
        .frame()
        .layers
        .iter()
        .find(|p| p.kind == kind)
        .unwrap()
        .offset
}

#[test]
fn pointer_at_surface_center_leaves_avatar_at_rest() {
    let mut avatar = ready_avatar();
    // bounds center is (300, 250)
    avatar.on_pointer_move(PointerSample::at(Point::new(300.0, 250.0)));
    avatar.tick(1.0);
    for placement in &avatar.frame().layers {
        assert_eq!(placement.offset, Vec2::ZERO);
    }
}

#[test]
fn tracking_follows_the_pointer_direction() {
    let mut avatar = ready_avatar();
    avatar.on_pointer_move(PointerSample::at(Point::new(500.0, 250.0)));
    avatar.tick(1.0);
    let eyes = offset_of(&avatar, LayerKind::EyesOpen);
    assert!(eyes.x > 0.0);
    assert_eq!(eyes.y, 0.0);

    avatar.on_pointer_move(PointerSample::at(Point::new(300.0, 50.0)));
    avatar.tick(1.0);
    let eyes = offset_of(&avatar, LayerKind::EyesOpen);
    assert_eq!(eyes.x, 0.0);
    assert!(eyes.y < 0.0);
}

#[test]
fn resize_re_measures_the_surface_center() {
    let mut avatar = ready_avatar();
    let pointer = Point::new(500.0, 250.0);
    avatar.on_pointer_move(PointerSample::at(pointer));
    avatar.tick(1.0);
    assert!(offset_of(&avatar, LayerKind::EyesOpen).x > 0.0);

    // Surface moves so that the same pointer now sits at its center.
    avatar.resize(SurfaceBounds::new(Point::new(300.0, 50.0), 400.0, 400.0).unwrap());
    avatar.on_pointer_move(PointerSample::at(pointer));
    avatar.tick(1.0);
    assert_eq!(offset_of(&avatar, LayerKind::EyesOpen), Vec2::ZERO);
}

#[test]
fn hover_over_link_opens_mouth_until_leave() {
    let mut avatar = ready_avatar();

    avatar.on_pointer_over(HoverTarget::Plain);
    assert_eq!(avatar.frame().expression.mouth, chibi::MouthPose::Closed);

    avatar.on_pointer_over(HoverTarget::Link);
    assert_eq!(avatar.frame().expression.mouth, chibi::MouthPose::Smile);

    avatar.on_pointer_out(HoverTarget::Link);
    assert_eq!(avatar.frame().expression.mouth, chibi::MouthPose::Closed);
}

#[test]
fn blink_cycles_do_not_disturb_hover_smile() {
    let mut avatar = ready_avatar();
    avatar.on_pointer_over(HoverTarget::Button);

    let mut saw_blink = false;
    for _ in 0..120 {
        avatar.tick(0.05);
        let frame = avatar.frame();
        assert_eq!(frame.expression.mouth, chibi::MouthPose::Smile);
        if frame.expression.eyes == EyePose::Blinking {
            saw_blink = true;
        }
    }
    assert!(saw_blink, "a blink should occur within six seconds");
}

#[test]
fn dizzy_scenario_runs_its_full_timeline_exactly_once() {
    let mut avatar = ready_avatar();
    avatar.on_pointer_move(PointerSample::at(Point::new(420.0, 250.0)));
    avatar.tick(1.0);
    let held = offset_of(&avatar, LayerKind::HairFront);

    let jump = PointerSample {
        position: Point::new(20.0, 250.0),
        movement: Vec2::new(-640.0, 0.0),
    };
    avatar.on_pointer_move(jump);
    assert!(avatar.frame().expression.dizzy.is_some());

    // A second abrupt jump mid-cycle is ignored and tracking stays frozen.
    avatar.tick(1.0);
    avatar.on_pointer_move(jump);
    avatar.on_pointer_move(PointerSample::at(Point::new(500.0, 450.0)));
    avatar.tick(1.0);
    assert!(avatar.frame().expression.dizzy.is_some());
    assert_eq!(offset_of(&avatar, LayerKind::HairFront), held);

    // Spirals spin in opposing directions while active.
    let frame = avatar.frame();
    let rot = |kind: LayerKind| {
        frame
            .layers
            .iter()
            .find(|p| p.kind == kind)
            .unwrap()
            .rotation_deg
    };
    assert!(rot(LayerKind::SpiralLeft) < 0.0);
    assert!(rot(LayerKind::SpiralRight) > 0.0);

    // After the configured duration the avatar is neutral and live again.
    avatar.tick(4.0);
    let frame = avatar.frame();
    assert!(frame.expression.dizzy.is_none());
    assert_eq!(frame.expression.eyes, EyePose::Open);
    assert_eq!(frame.expression.mouth, chibi::MouthPose::Closed);

    avatar.on_pointer_move(PointerSample::at(Point::new(100.0, 50.0)));
    avatar.tick(1.0);
    assert_ne!(offset_of(&avatar, LayerKind::HairFront), held);
}

#[test]
fn entrance_plays_once_per_session_latch() {
    let first = Avatar::new(AvatarConfig {
        already_introduced: false,
        motion: MotionPreference::Full,
    })
    .unwrap();
    let body = first
        .frame()
        .layers
        .iter()
        .find(|p| p.kind == LayerKind::Body)
        .unwrap()
        .offset;
    assert!(body.y > 0.0, "body starts below its resting position");

    let renavigated = Avatar::new(AvatarConfig {
        already_introduced: true,
        motion: MotionPreference::Full,
    })
    .unwrap();
    let body = renavigated
        .frame()
        .layers
        .iter()
        .find(|p| p.kind == LayerKind::Body)
        .unwrap()
        .offset;
    assert_eq!(body, Vec2::ZERO);
}

#[test]
fn layer_stacking_survives_every_state() {
    let mut avatar = ready_avatar();
    avatar.on_pointer_move(PointerSample {
        position: Point::new(0.0, 0.0),
        movement: Vec2::new(600.0, 600.0),
    });

    for _ in 0..80 {
        avatar.tick(0.1);
        let frame = avatar.frame();
        let z: Vec<i32> = frame.layers.iter().map(|p| p.z).collect();
        let mut sorted = z.clone();
        sorted.sort_unstable();
        assert_eq!(z, sorted, "placements must stay back-to-front");
    }
}
