use super::*;
use crate::assets::loader::InMemoryClipLoader;

fn sprite(w: u32, h: u32) -> SpriteFrame {
    SpriteFrame::from_rgba(image::RgbaImage::from_pixel(w, h, image::Rgba([1, 2, 3, 255])))
}

#[test]
fn direction_parse_is_case_insensitive() {
    assert_eq!("LEFT".parse::<Direction>().unwrap(), Direction::Left);
    assert_eq!(" Center ".parse::<Direction>().unwrap(), Direction::Center);
    assert_eq!("right".parse::<Direction>().unwrap(), Direction::Right);
    assert!("up".parse::<Direction>().is_err());
}

#[test]
fn unknown_label_resolves_to_center() {
    assert_eq!(Direction::resolve("up"), Direction::Center);
    assert_eq!(Direction::resolve(""), Direction::Center);
    assert_eq!(Direction::resolve("Right"), Direction::Right);
}

#[test]
fn rgb_sprite_has_no_alpha() {
    let s = SpriteFrame::from_rgb(image::RgbImage::new(4, 2));
    assert!(!s.has_alpha());
    assert_eq!((s.width(), s.height()), (4, 2));
    assert!(sprite(1, 1).has_alpha());
}

#[test]
fn library_hands_out_shared_clips() {
    let lib = ClipLibrary::new(
        AnimationClip::new(Direction::Left, vec![sprite(2, 2)]),
        AnimationClip::new(Direction::Center, vec![sprite(2, 2), sprite(2, 2)]),
        AnimationClip::empty(Direction::Right),
    );
    let a = lib.clip(Direction::Center);
    let b = lib.clone().clip(Direction::Center);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.len(), 2);
    assert!(lib.clip(Direction::Right).is_empty());
}

#[test]
fn failed_loads_degrade_to_empty_clips() {
    let loader = InMemoryClipLoader::new().with_clip(Direction::Left, vec![sprite(3, 3)]);
    let lib = ClipLibrary::load(&loader);
    assert_eq!(lib.clip(Direction::Left).len(), 1);
    assert!(lib.clip(Direction::Center).is_empty());
    assert!(lib.clip(Direction::Right).is_empty());
}

#[test]
fn loaded_clips_land_in_their_own_slots() {
    let loader = InMemoryClipLoader::new()
        .with_clip(Direction::Left, vec![sprite(2, 2)])
        .with_clip(Direction::Center, vec![sprite(2, 2), sprite(2, 2)])
        .with_clip(Direction::Right, vec![sprite(2, 2); 3]);
    let lib = ClipLibrary::load(&loader);
    for (expected_len, direction) in (1..).zip(Direction::ALL) {
        let clip = lib.clip(direction);
        assert_eq!(clip.direction(), direction);
        assert_eq!(clip.len(), expected_len);
    }
}
