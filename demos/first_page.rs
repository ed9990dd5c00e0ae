//! Draws the first page of a text box into a PNG.
//!
//! Usage: `cargo run --example first_page -- [TEXT_FILE|-] [OUT.png] [WIDTH] [HEIGHT]`

use std::io::Read;
use std::sync::Arc;

use fukidashi::{
    FontFace, FontStorage, TextBox,
    geometry::size,
    options::{AvatarFit, AvatarLocation, ChevronLocation, TextBoxOption},
    text::DrawOptions,
    theme::SimpleTheme,
};

const SAMPLE: &str = "The lighthouse keeper waves you in from the storm. \
    \"Dry yourself by the fire, traveller. The road north has been closed since \
    the bridge washed out, and the ferry will not sail until the wind drops.\"";

fn read_text(source: Option<&str>) -> String {
    match source {
        None => SAMPLE.to_string(),
        Some("-") => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .expect("failed to read stdin");
            text
        }
        Some(path) => std::fs::read_to_string(path).expect("failed to read text file"),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let text = read_text(args.first().map(String::as_str));
    let out = args.get(1).cloned().unwrap_or_else(|| "first_page.png".into());
    let width: i32 = args.get(2).map_or(600, |w| w.parse().expect("width"));
    let height: i32 = args.get(3).map_or(150, |h| h.parse().expect("height"));

    let mut font_storage = FontStorage::new();
    font_storage.load_system_fonts();
    let theme = match font_storage.default_face(16.0) {
        Some(face) => {
            let face: Arc<dyn FontFace> = Arc::new(face);
            SimpleTheme::new(face)
        }
        None => {
            println!("no system font found, using block glyphs");
            SimpleTheme::default()
        }
    };

    let mut text_box = TextBox::new(
        Arc::new(theme),
        &text,
        size(width, height),
        [
            TextBoxOption::from(AvatarLocation::Left),
            TextBoxOption::from(AvatarFit::NearestNeighbour),
            TextBoxOption::from(ChevronLocation::CenterBottomInsideFrame),
        ],
    )
    .expect("failed to build the text box");

    let pages = text_box
        .calculate_all_pages(size(width, height))
        .expect("pagination failed");

    let mut image = image::RgbaImage::new(width as u32, height as u32);
    let start = std::time::Instant::now();
    text_box
        .draw_next_page_frame(&mut image, &DrawOptions::default())
        .expect("draw failed");
    println!("page 1 of {pages} drawn in {:?}", start.elapsed());

    image.save(&out).expect("failed to save image");
    println!("saved to {out}");
}
