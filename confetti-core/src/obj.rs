//! Wavefront OBJ parser (vertex positions and triangular faces only)

use std::fs;
use std::path::Path;

use nom::{
    bytes::complete::take_till,
    character::complete::{i64 as integer, space0, space1},
    multi::many1,
    number::complete::float,
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::{Mesh, Triangle, Vertex};

/// Read and parse an OBJ file from disk
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let mesh = parse_obj(&text)?;
    log::info!(
        "Loaded OBJ {}: {} vertices, {} faces",
        path.display(),
        mesh.vertices.len(),
        mesh.triangles.len()
    );
    if let Some((min, max)) = mesh.bounds() {
        log::debug!(
            "Mesh extents: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }
    Ok(mesh)
}

/// Parse OBJ text.
///
/// `v` and `f` statements are read; everything else is ignored. Faces that are
/// not triangles are logged and skipped. Face references may carry texture
/// and normal indices (`1/2/3`, `1//3`) and may be negative (relative).
pub fn parse_obj(input: &str) -> Result<Mesh> {
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();
    let mut skipped = 0usize;

    for (number, raw) in input.lines().enumerate() {
        let line = number + 1;
        let statement = raw.split('#').next().unwrap_or("").trim();
        let (keyword, rest) = match statement.find(char::is_whitespace) {
            Some(at) => statement.split_at(at),
            None => (statement, ""),
        };

        match keyword {
            "v" => {
                let (_, v) = parse_position(rest).map_err(|e| Error::Obj {
                    line,
                    message: format!("bad vertex: {e}"),
                })?;
                vertices.push(v);
            }
            "f" => {
                let (remaining, refs) = parse_face_refs(rest).map_err(|e| Error::Obj {
                    line,
                    message: format!("bad face: {e}"),
                })?;
                if !remaining.is_empty() {
                    return Err(Error::Obj {
                        line,
                        message: format!("trailing data in face: {remaining:?}"),
                    });
                }
                if refs.len() != 3 {
                    log::warn!("OBJ line {line}: skipping face with {} vertices", refs.len());
                    skipped += 1;
                    continue;
                }
                let mut indices = [0usize; 3];
                for (slot, &r) in indices.iter_mut().zip(&refs) {
                    *slot = resolve_index(r, vertices.len()).ok_or_else(|| Error::Obj {
                        line,
                        message: format!("invalid vertex reference {r}"),
                    })?;
                }
                triangles.push(Triangle::new(indices[0], indices[1], indices[2]));
            }
            _ => {}
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} non-triangular faces");
    }

    Ok(Mesh::new(vertices, triangles))
}

/// Map a 1-based (or negative, relative) OBJ reference to a 0-based index.
///
/// Positive references beyond the vertices read so far are kept; the renderer
/// skips triangles whose indices fall outside the final vertex array.
fn resolve_index(reference: i64, vertex_count: usize) -> Option<usize> {
    match reference {
        0 => None,
        r if r > 0 => usize::try_from(r - 1).ok(),
        r => {
            let back = usize::try_from(r.unsigned_abs()).ok()?;
            vertex_count.checked_sub(back)
        }
    }
}

fn parse_position(input: &str) -> IResult<&str, Vertex> {
    let (input, x) = preceded(space1, float)(input)?;
    let (input, y) = preceded(space1, float)(input)?;
    let (input, z) = preceded(space1, float)(input)?;
    // An optional trailing w component is ignored
    Ok((input, Vertex::new(x, y, z)))
}

fn parse_face_refs(input: &str) -> IResult<&str, Vec<i64>> {
    terminated(many1(preceded(space1, parse_face_ref)), space0)(input)
}

/// `i`, `i/t`, `i/t/n` or `i//n`; only the position index is kept
fn parse_face_ref(input: &str) -> IResult<&str, i64> {
    terminated(integer, take_till(char::is_whitespace))(input)
}
