use std::io::Cursor;

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "keeperviz_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn png_bytes(img: image::DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn rgba_png(marker: u8) -> Vec<u8> {
    png_bytes(image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        2,
        3,
        image::Rgba([marker, 0, 0, 128]),
    )))
}

#[test]
fn folder_frames_are_sorted_by_name_and_filtered() {
    let root = temp_dir("loader_sorted");
    let dir = root.join("dive_left");
    std::fs::create_dir_all(&dir).unwrap();

    std::fs::write(dir.join("frame_0002.png"), rgba_png(2)).unwrap();
    std::fs::write(dir.join("frame_0000.png"), rgba_png(0)).unwrap();
    std::fs::write(dir.join("frame_0001.PNG"), rgba_png(1)).unwrap();
    std::fs::write(dir.join("notes.txt"), b"not a sprite").unwrap();
    std::fs::write(dir.join("broken.png"), b"not a png either").unwrap();

    let frames = FolderClipLoader::new(&root)
        .load_clip(Direction::Left)
        .unwrap();
    let markers: Vec<u8> = frames.iter().map(|f| f.pixels().get_pixel(0, 0)[0]).collect();
    assert_eq!(markers, vec![0, 1, 2]);
    assert!(frames.iter().all(|f| f.has_alpha()));
    assert_eq!((frames[0].width(), frames[0].height()), (2, 3));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn missing_folder_is_an_asset_error() {
    let root = temp_dir("loader_missing");
    let err = FolderClipLoader::new(&root)
        .load_clip(Direction::Center)
        .unwrap_err();
    assert!(matches!(err, KeeperError::Asset(_)));
}

#[test]
fn clip_dir_uses_dive_prefix() {
    let loader = FolderClipLoader::new("anims");
    assert_eq!(
        loader.clip_dir(Direction::Right),
        PathBuf::from("anims").join("dive_right")
    );
}

#[test]
fn decode_keeps_alpha_flag() {
    let rgb = png_bytes(image::DynamicImage::ImageRgb8(image::RgbImage::new(1, 1)));
    assert!(!decode_sprite(&rgb).unwrap().has_alpha());
    assert!(decode_sprite(&rgba_png(7)).unwrap().has_alpha());
    assert!(decode_sprite(b"garbage").is_err());
}

#[test]
fn in_memory_loader_serves_registered_clips() {
    let sprite = decode_sprite(&rgba_png(3)).unwrap();
    let loader = InMemoryClipLoader::new().with_clip(Direction::Right, vec![sprite; 4]);
    assert_eq!(loader.load_clip(Direction::Right).unwrap().len(), 4);
    assert!(loader.load_clip(Direction::Left).is_err());
}
