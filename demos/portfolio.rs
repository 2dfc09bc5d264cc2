//! Portfolio Demo - The five-section scroll-reveal document.
//!
//! A single scrollable document (intro, experience, projects, skills,
//! contact). Blocks fade/slide in the first time they scroll into view,
//! the projects and skills sections stagger their items, and the skills
//! section carries a pointer-tracked glow.
//!
//! Controls: mouse wheel or arrow keys scroll, 1-5 jump to sections,
//! q or Ctrl+C quits.
//!
//! Run with: cargo run --example portfolio

use std::cell::Cell;
use std::io::{stdout, Write};
use std::rc::Rc;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use reveal_tui::{
    allocate_block, arm_block, clock_now, input::on_key, latest_sample, mount, pipeline,
    sample_block, sample_item, scroll_to_block, scroll_y, set_block_rect, set_item_count,
    set_viewport_size, tick, track_region, BlockFlags, Rect, RevealTransition,
};

const SECTION_IDS: [&str; 5] = ["intro", "experience", "projects", "skills", "contact"];

const PROJECTS: [(&str, &str); 4] = [
    ("Smart Expense Tracker", "Budgeting with charts and analytics"),
    ("AI Career Guide", "Interactive career suggestion system"),
    ("Guessing Game", "CLI number game with difficulty levels"),
    ("Portfolio Website", "This document, animations included"),
];

const SKILLS: [&str; 18] = [
    "HTML", "CSS", "JavaScript", "React", "Tailwind", "Motion",
    "Python", "Node.js", "MongoDB", "PHP", "Express", "MySQL",
    "Git", "GitHub", "Figma", "Adobe XD", "Web Design", "UI/UX",
];

const CONTACTS: [(&str, &str); 4] = [
    ("Email", "kandevishnu1234@email.com"),
    ("Phone", "8074347470"),
    ("GitHub", "github.com/kandevishnu"),
    ("LinkedIn", "linkedin.com/in/kande-vishnu"),
];

/// Vertical gap between blocks, in rows.
const BLOCK_GAP: f32 = 6.0;

/// Reveal offsets are in abstract units; the terminal maps 10 units to
/// one row so a 50-unit slide reads as a 5-row entrance.
const UNITS_PER_ROW: f32 = 10.0;

fn main() -> std::io::Result<()> {
    let (cols, rows) = size()?;
    set_viewport_size(cols as f32, rows as f32);

    // Lay the document out as a vertical stack of blocks
    let mut y = 2.0;
    let mut blocks = Vec::new();
    for id in SECTION_IDS {
        let (flags, items, height) = match id {
            "projects" => (BlockFlags::STAGGER_ITEMS, PROJECTS.len(), 4.0 + PROJECTS.len() as f32),
            "skills" => (
                BlockFlags::STAGGER_ITEMS | BlockFlags::TRACK_POINTER,
                SKILLS.len(),
                4.0 + (SKILLS.len() as f32 / 3.0).ceil(),
            ),
            "contact" => (BlockFlags::NONE, CONTACTS.len(), 4.0 + CONTACTS.len() as f32),
            _ => (BlockFlags::NONE, 0, 6.0),
        };

        let index = allocate_block(id, flags);
        set_block_rect(index, Rect::new(2.0, y, cols as f32 - 4.0, height));
        set_item_count(index, items);
        blocks.push(index);
        y += height + BLOCK_GAP;
    }

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, Hide)?;

    let handle = mount()?;

    // Arm every block and attach the glow tracker to the skills region
    let disarms: Vec<_> = blocks.iter().map(|&index| arm_block(index)).collect();
    let untrack = track_region(blocks[3]);

    let quit = Rc::new(Cell::new(false));
    let quit_for_keys = quit.clone();
    let _unbind = on_key(move |press| match press.key.as_str() {
        "q" | "Escape" => {
            quit_for_keys.set(true);
            true
        }
        "ArrowUp" => pipeline::scroll_by(-pipeline::LINE_SCROLL),
        "ArrowDown" => pipeline::scroll_by(pipeline::LINE_SCROLL),
        "PageUp" => pipeline::scroll_by(-(rows as f32) * 0.9),
        "PageDown" => pipeline::scroll_by(rows as f32 * 0.9),
        "1" | "2" | "3" | "4" | "5" => {
            let anchor = press.key.parse::<usize>().unwrap_or(1) - 1;
            scroll_to_block(SECTION_IDS[anchor])
        }
        _ => false,
    });

    let result = (|| -> std::io::Result<()> {
        while tick(&handle)? {
            if quit.get() {
                break;
            }
            draw(&blocks)?;
        }
        Ok(())
    })();

    untrack();
    for disarm in disarms {
        disarm();
    }
    handle.unmount();
    execute!(stdout(), Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;

    result
}

/// Map an opacity to a terminal color ramp (None = too faint to draw).
fn opacity_color(opacity: f32) -> Option<Color> {
    if opacity < 0.15 {
        None
    } else if opacity < 0.5 {
        Some(Color::DarkGrey)
    } else if opacity < 0.85 {
        Some(Color::Grey)
    } else {
        Some(Color::White)
    }
}

fn draw_text(out: &mut impl Write, x: f32, y: f32, color: Color, text: &str) -> std::io::Result<()> {
    let (cols, rows) = size()?;
    if x < 0.0 || y < 0.0 || y >= rows as f32 || x >= cols as f32 {
        return Ok(());
    }
    queue!(
        out,
        MoveTo(x as u16, y as u16),
        SetForegroundColor(color),
        Print(text)
    )?;
    Ok(())
}

fn draw_transition(
    out: &mut impl Write,
    transition: RevealTransition,
    x: f32,
    y: f32,
    text: &str,
) -> std::io::Result<()> {
    let Some(color) = opacity_color(transition.opacity) else {
        return Ok(());
    };
    draw_text(out, x, y + transition.offset_y / UNITS_PER_ROW, color, text)
}

fn draw(blocks: &[usize]) -> std::io::Result<()> {
    let mut out = stdout();
    let now = clock_now();
    let scroll = scroll_y();

    queue!(out, Clear(ClearType::All))?;

    for (ordinal, (section, &index)) in SECTION_IDS.iter().zip(blocks).enumerate() {
        let Some(rect) = reveal_tui::block_rect(index) else {
            continue;
        };
        let screen = rect.shifted_y(-scroll);
        let block = sample_block(index, now);

        let title = format!("{}. {}", ordinal + 1, section);
        draw_transition(&mut out, block, screen.x, screen.y, &title.to_uppercase())?;

        match *section {
            "intro" => {
                draw_transition(&mut out, block, screen.x + 2.0, screen.y + 2.0,
                    "Hi, I'm Kande Vishnu")?;
                draw_transition(&mut out, block, screen.x + 2.0, screen.y + 3.0,
                    "Full-stack developer building beautiful, performant apps")?;
            }
            "experience" => {
                draw_transition(&mut out, block, screen.x + 2.0, screen.y + 2.0,
                    "Software Intern - Remote | 2024-2025")?;
                draw_transition(&mut out, block, screen.x + 2.0, screen.y + 3.0,
                    "Full-stack projects for real clients")?;
            }
            "projects" => {
                for (item, (name, blurb)) in PROJECTS.iter().enumerate() {
                    let sample = sample_item(index, item, now);
                    let line = format!("* {name} - {blurb}");
                    draw_transition(&mut out, sample, screen.x + 2.0,
                        screen.y + 2.0 + item as f32, &line)?;
                }
            }
            "skills" => {
                let col_width = (rect.width - 4.0) / 3.0;
                for (item, name) in SKILLS.iter().enumerate() {
                    let sample = sample_item(index, item, now);
                    let col = (item % 3) as f32;
                    let row = (item / 3) as f32;
                    draw_transition(&mut out, sample, screen.x + 2.0 + col * col_width,
                        screen.y + 2.0 + row, &format!("[{name}]"))?;
                }
                // Decorative glow centered on the latest pointer sample
                if let Some(sample) = latest_sample(index) {
                    draw_text(&mut out, screen.x + sample.x, screen.y + sample.y,
                        Color::Magenta, "*")?;
                }
            }
            "contact" => {
                for (item, (label, value)) in CONTACTS.iter().enumerate() {
                    let sample = sample_item(index, item, now);
                    draw_transition(&mut out, sample, screen.x + 2.0,
                        screen.y + 2.0 + item as f32, &format!("{label}: {value}"))?;
                }
            }
            _ => {}
        }
    }

    let (_, rows) = size()?;
    draw_text(&mut out, 2.0, rows as f32 - 1.0, Color::DarkGrey,
        "wheel/arrows scroll | 1-5 jump | q quit")?;

    queue!(out, ResetColor)?;
    out.flush()
}
