use std::io::{self, Write};

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{
    core::{
        component::DrawPriority,
        id::NodeId,
        visual::{Primary, Secondary},
        world::Core,
    },
    error::{Error, Result},
    geom::Rect,
    layout::Visibility,
};

/// Traverses a tree of nodes and returns a string showing each node's name,
/// bounds, visibility and visual state, with ANSI colours. Components are
/// listed under their host, marked with their draw priority.
pub fn dump(core: &Core, root: NodeId) -> Result<String> {
    let mut buffer = Buffer::ansi();
    dump_node(&mut buffer, core, root, 0, None)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// As [`dump`], without colours.
pub fn dump_plain(core: &Core, root: NodeId) -> Result<String> {
    let mut buffer = Buffer::no_color();
    dump_node(&mut buffer, core, root, 0, None)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Map a buffer write failure into a core error.
fn io_err(e: io::Error) -> Error {
    Error::Internal(format!("dump: {e}"))
}

/// Format a rect compactly.
fn rect(r: Rect) -> String {
    format!("({}, {}) {}×{}", r.tl.x, r.tl.y, r.w, r.h)
}

/// Write an indented, coloured label followed by a value.
fn write_field(buffer: &mut Buffer, indent: &str, label: &str, value: &str) -> Result<()> {
    write!(buffer, "{indent}  ").map_err(io_err)?;
    buffer
        .set_color(ColorSpec::new().set_fg(Some(Color::Green)))
        .map_err(io_err)?;
    write!(buffer, "{label}").map_err(io_err)?;
    buffer.reset().map_err(io_err)?;
    writeln!(buffer, " {value}").map_err(io_err)
}

/// Walk a node subtree and emit formatted output.
fn dump_node(
    buffer: &mut Buffer,
    core: &Core,
    node_id: NodeId,
    level: usize,
    component: Option<DrawPriority>,
) -> Result<()> {
    let node = core.get(node_id)?;
    let indent = "    ".repeat(level);

    write!(buffer, "{indent}").map_err(io_err)?;
    if let Some(p) = component {
        buffer
            .set_color(ColorSpec::new().set_fg(Some(Color::Blue)))
            .map_err(io_err)?;
        write!(buffer, "[{p:?}] ").map_err(io_err)?;
    }
    buffer
        .set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))
        .map_err(io_err)?;
    write!(buffer, "{}", node.name()).map_err(io_err)?;
    buffer.reset().map_err(io_err)?;

    let state = core.visual_state(node_id)?;
    let mut indicators: Vec<(&str, Color)> = vec![];
    match node.visibility() {
        Visibility::Visible => {}
        Visibility::Hidden => indicators.push(("hidden", Color::Yellow)),
        Visibility::Collapsed => indicators.push(("collapsed", Color::Yellow)),
    }
    match state.primary {
        Primary::Normal => {}
        Primary::Selected => indicators.push(("selected", Color::Magenta)),
        Primary::Disabled => indicators.push(("disabled", Color::Red)),
    }
    match state.secondary {
        Secondary::None => {}
        Secondary::Hovered => indicators.push(("hovered", Color::Magenta)),
        Secondary::Pressed => indicators.push(("pressed", Color::Magenta)),
    }
    if core.focus() == Some(node_id) {
        indicators.push(("FOCUSED", Color::Magenta));
    }
    for (i, (label, color)) in indicators.iter().enumerate() {
        write!(buffer, "{}", if i == 0 { " " } else { ", " }).map_err(io_err)?;
        buffer
            .set_color(ColorSpec::new().set_fg(Some(*color)))
            .map_err(io_err)?;
        write!(buffer, "{label}").map_err(io_err)?;
        buffer.reset().map_err(io_err)?;
    }
    writeln!(buffer).map_err(io_err)?;

    write_field(buffer, &indent, "layout:", &rect(node.layout_bounds()))?;
    write_field(buffer, &indent, "render:", &rect(node.render_bounds()))?;
    write_field(buffer, &indent, "content:", &rect(node.content_bounds()))?;

    for c in &node.components {
        dump_node(
            buffer,
            core,
            c.element,
            level + 1,
            Some(c.component.draw_priority),
        )?;
    }
    if node.visibility().takes_space() {
        for child in node.children() {
            dump_node(buffer, core, *child, level + 1, None)?;
        }
    }
    Ok(())
}
