use crate::{
    refs::{ObjectReferences, RefType},
    standard_fonts::StandardFont,
    Pt, TypesetError,
};
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Finish, Name, Pdf, Ref, Str,
};
use std::collections::HashMap;
use std::fmt::Write;

/// A font that text can be measured and drawn with.
///
/// TrueType / OpenType faces are embedded in their entirety in the generated PDF, so large
/// fonts may dramatically increase the size of the output. The standard fonts are never
/// embedded; every PDF reader provides them.
pub enum Font {
    /// A parsed TrueType or OpenType face
    TrueType { face: OwnedFace, name: String },
    /// One of the PDF standard Type1 fonts
    Standard(StandardFont),
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed. `name` is used when the face carries no usable name record.
    pub fn load(bytes: Vec<u8>, name: &str) -> Result<Font, TypesetError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        let name = face_name(&face).unwrap_or_else(|| name.to_string());

        Ok(Font::TrueType { face, name })
    }

    /// Use one of the standard fonts
    pub fn standard(font: StandardFont) -> Font {
        Font::Standard(font)
    }

    /// The name of the font as it will be written in the PDF
    pub fn name(&self) -> &str {
        match self {
            Font::TrueType { name, .. } => name.as_str(),
            Font::Standard(font) => font.base_font(),
        }
    }

    /// Calculate the width of a given string of text at the given font size
    pub fn width_of_text(&self, text: &str, size: Pt) -> Pt {
        match self {
            Font::TrueType { face, .. } => {
                let face = face.as_face_ref();
                let scaling = size / face.units_per_em() as f32;
                text.chars()
                    .filter_map(|ch| self.glyph_id(ch).or_else(|| self.replacement_glyph_id()))
                    .map(|gid| {
                        scaling
                            * face
                                .glyph_hor_advance(owned_ttf_parser::GlyphId(gid))
                                .unwrap_or_default() as f32
                    })
                    .sum()
            }
            Font::Standard(font) => {
                let units: u32 = text.chars().map(|ch| font.char_width(ch) as u32).sum();
                size * (units as f32 / 1000.0)
            }
        }
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        match self {
            Font::TrueType { face, .. } => face.as_face_ref().glyph_index(ch).map(|i| i.0),
            Font::Standard(_) => None,
        }
    }

    pub fn replacement_glyph_id(&self) -> Option<u16> {
        match self {
            Font::TrueType { face, .. } => face
                .as_face_ref()
                .glyph_index('\u{FFFD}')
                .or_else(|| face.as_face_ref().glyph_index('?'))
                .map(|i| i.0),
            Font::Standard(_) => None,
        }
    }

    /// Encode text as a content-stream string operand, ready to be followed by `Tj`
    pub(crate) fn encode_operand(&self, text: &str) -> String {
        let mut operand = String::with_capacity(text.len() * 4 + 2);
        match self {
            Font::TrueType { .. } => {
                operand.push('<');
                for ch in text.chars() {
                    let gid = self
                        .glyph_id(ch)
                        .or_else(|| self.replacement_glyph_id())
                        .unwrap_or_default();
                    // writing to a String cannot fail
                    let _ = write!(operand, "{gid:04x}");
                }
                operand.push('>');
            }
            Font::Standard(font) => {
                operand.push('(');
                for byte in font.encode(text) {
                    match byte {
                        b'(' | b')' | b'\\' => {
                            operand.push('\\');
                            operand.push(byte as char);
                        }
                        0x20..=0x7e => operand.push(byte as char),
                        _ => {
                            let _ = write!(operand, "\\{byte:03o}");
                        }
                    }
                }
                operand.push(')');
            }
        }
        operand
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<Font>, writer: &mut Pdf) {
        let font_index = id.index();
        let font_id = refs.gen(RefType::Font(font_index));

        match self {
            Font::TrueType { face, name } => {
                let cid_font_id = write_cid(face, name, refs, font_index, writer);
                let to_unicode_id = write_to_unicode(face, refs, font_index, writer);

                let mut font = writer.type0_font(font_id);
                font.base_font(Name(name.as_bytes()));
                font.encoding_predefined(Name(b"Identity-H"));
                font.descendant_font(cid_font_id);
                font.to_unicode(to_unicode_id);
            }
            Font::Standard(standard) => {
                writer
                    .type1_font(font_id)
                    .base_font(Name(standard.base_font().as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
            }
        }
    }
}

fn face_name(face: &OwnedFace) -> Option<String> {
    face.as_face_ref()
        .names()
        .into_iter()
        .find(|name| name.name_id == owned_ttf_parser::name_id::POST_SCRIPT_NAME && name.is_unicode())
        .and_then(|name| name.to_string())
        .map(|name| name.replace(' ', "-"))
}

fn write_cid(
    face: &OwnedFace,
    name: &str,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> Ref {
    let font_descriptor_id = write_descriptor(face, name, refs, font_index, writer);

    let id = refs.gen(RefType::CidFont(font_index));

    let mut cid_font = writer.cid_font(id);
    cid_font.subtype(CidFontType::Type2);
    cid_font.base_font(Name(name.as_bytes()));
    cid_font.system_info(SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    });
    cid_font.font_descriptor(font_descriptor_id);

    let ids = glyph_ids(face);
    let ids_augmented = glyphs_sizing(face, &ids);

    let scaling = 1000.0 / face.as_face_ref().units_per_em() as f32;

    // find the most popular width to use as the default
    // <width, count>
    let mut widths_counts: HashMap<u16, usize> = HashMap::new();
    for (_, (width, _)) in ids_augmented.values() {
        *widths_counts.entry(*width).or_insert(0) += 1;
    }
    let most_common_width = widths_counts
        .iter()
        .max_by_key(|(_, &count)| count)
        .map(|(&sz, _)| sz as f32 * scaling)
        .unwrap_or(1000.0);

    let mut id_widths: Vec<(u16, f32)> = ids_augmented
        .iter()
        .map(|(&cid, &(_, (width, _)))| (cid, width as f32 * scaling))
        .collect();
    id_widths.sort_by_key(|(id, _)| *id);

    let mut widths = cid_font.widths();
    if let Some(first) = id_widths.first() {
        let mut start_cid: u16 = first.0;
        let mut current_widths: Vec<f32> = vec![first.1];
        for (cid, width) in id_widths.into_iter().skip(1) {
            if (cid - start_cid) as usize > current_widths.len() {
                // gap in the cid sequence, start a new block
                widths.consecutive(start_cid, current_widths.clone());
                start_cid = cid;
                current_widths.clear();
            }

            current_widths.push(width);
        }

        if !current_widths.is_empty() {
            widths.consecutive(start_cid, current_widths);
        }
    }
    widths.finish();

    cid_font.default_width(most_common_width);
    cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

    id
}

fn write_font_data(
    face: &OwnedFace,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> Ref {
    let id = refs.gen(RefType::FontData(font_index));

    writer
        .stream(id, face.as_slice())
        .pair(Name(b"Length1"), face.as_slice().len() as i32);

    id
}

fn write_descriptor(
    face: &OwnedFace,
    name: &str,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> Ref {
    let font_data_stream_id = write_font_data(face, refs, font_index, writer);

    let gids = glyph_ids(face);
    let gids_augmented = glyphs_sizing(face, &gids);

    let max_width = gids_augmented
        .values()
        .map(|&(_, (w, _))| w)
        .max()
        .unwrap_or_default();
    let max_height = gids_augmented
        .values()
        .map(|&(_, (_, h))| h)
        .max()
        .unwrap_or_default();
    let sum_width: usize = gids_augmented.values().map(|&(_, (w, _))| w as usize).sum();
    let avg_width = sum_width as f32 / gids_augmented.len().max(1) as f32;

    let id = refs.gen(RefType::FontDescriptor(font_index));
    let face_ref = face.as_face_ref();

    let mut descriptor = writer.font_descriptor(id);
    descriptor.name(Name(name.as_bytes()));

    let mut flags: FontFlags = FontFlags::empty();
    if face_ref.is_monospaced() {
        flags.set(FontFlags::FIXED_PITCH, true);
    }
    if face_ref.is_italic() {
        flags.set(FontFlags::ITALIC, true);
    }
    flags.set(FontFlags::SYMBOLIC, true);
    descriptor.flags(flags);

    let scaling = 1000.0 / face_ref.units_per_em() as f32;
    descriptor.bbox(pdf_writer::Rect {
        x1: 0.0,
        y1: 0.0,
        x2: max_width as f32 * scaling,
        y2: max_height as f32 * scaling,
    });
    descriptor.italic_angle(0.0);
    descriptor.ascent(face_ref.ascender() as f32 * scaling);
    descriptor.descent(face_ref.descender() as f32 * scaling);
    descriptor.leading(face_ref.line_gap() as f32 * scaling);
    descriptor.cap_height(
        face_ref
            .capital_height()
            .map(|h| h as f32 * scaling)
            .unwrap_or(1000.0),
    );
    descriptor.x_height(
        face_ref
            .x_height()
            .unwrap_or_else(|| face_ref.capital_height().unwrap_or_default()) as f32
            * scaling,
    );
    descriptor.stem_v(80.0);
    descriptor.avg_width(avg_width * scaling);
    descriptor.max_width(max_width as f32 * scaling);
    descriptor.missing_width(max_width as f32 * scaling);

    descriptor.font_file2(font_data_stream_id);

    id
}

fn glyph_ids(face: &OwnedFace) -> HashMap<u16, char> {
    let mut map: HashMap<u16, char> = HashMap::new();

    let Some(cmap) = face.as_face_ref().tables().cmap else {
        return map;
    };

    for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
        subtable.codepoints(|codepoint: u32| {
            if let Ok(ch) = char::try_from(codepoint) {
                if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0) {
                    map.entry(index.0).or_insert(ch);
                }
            }
        });
    }

    map
}

fn glyphs_sizing(face: &OwnedFace, ids: &HashMap<u16, char>) -> HashMap<u16, (char, (u16, i16))> {
    let face = face.as_face_ref();
    let mut ids_augmented: HashMap<u16, (char, (u16, i16))> = HashMap::new();
    for (&id, &ch) in ids.iter() {
        if let Some(gid) = face.glyph_index(ch) {
            if let Some(h_advance) = face.glyph_hor_advance(gid) {
                let height = face
                    .glyph_bounding_box(gid)
                    .map(|bbox| bbox.y_max - bbox.y_min - face.descender())
                    .unwrap_or(1000);
                ids_augmented.insert(id, (ch, (h_advance, height)));
            }
        }
    }
    ids_augmented
}

fn write_to_unicode(
    face: &OwnedFace,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> Ref {
    let id = refs.gen(RefType::ToUnicode(font_index));

    let mut map: String = r#"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
"#
    .replace("\r\n", "\n");

    let mut ids: Vec<(u16, char)> = glyph_ids(face).into_iter().collect();
    ids.sort_by_key(|&(id, _)| id);

    // each bfchar block holds at most 100 entries sharing a high byte
    let mut cmap_blocks: Vec<Vec<(u16, char)>> = Vec::new();
    let mut current_block: Vec<(u16, char)> = Vec::new();
    let mut high_byte: u8 = 0;
    for (id, ch) in ids.iter() {
        if (id >> 8) as u8 != high_byte || current_block.len() >= 100 {
            if !current_block.is_empty() {
                cmap_blocks.push(current_block.clone());
            }
            current_block.clear();
            high_byte = (id >> 8) as u8;
        }

        current_block.push((*id, *ch));
    }
    if !current_block.is_empty() {
        cmap_blocks.push(current_block);
    }

    for block in cmap_blocks.into_iter() {
        map.push_str(&format!("{} beginbfchar\n", block.len()));
        for (id, ch) in block.into_iter() {
            let ch: u32 = ch.into();
            map.push_str(&format!("<{id:04x}> <{:04x}>\n", ch));
        }
        map.push_str("endbfchar\n");
    }

    map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
        map.as_bytes(),
        miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
    );
    let mut stream = writer.stream(id, compressed.as_slice());
    stream.filter(pdf_writer::Filter::FlateDecode);

    id
}
