use std::io::{BufRead, Read, Write};
use std::path::Path;

use crate::error::GeomError;
use crate::pointcloud::PointCloud;

#[derive(Debug, Clone, Copy, PartialEq)]
enum PlyDataType {
    Float32,
    Float64,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
}

impl PlyDataType {
    fn size_of(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Float32 | Self::Int32 | Self::UInt32 => 4,
            Self::Float64 => 8,
        }
    }

    fn read_as_f64(&self, buf: &[u8]) -> f64 {
        match self {
            Self::Float32 => f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as f64,
            Self::Float64 => f64::from_le_bytes([
                buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
            ]),
            Self::Int8 => buf[0] as i8 as f64,
            Self::UInt8 => buf[0] as f64,
            Self::Int16 => i16::from_le_bytes([buf[0], buf[1]]) as f64,
            Self::UInt16 => u16::from_le_bytes([buf[0], buf[1]]) as f64,
            Self::Int32 => i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as f64,
            Self::UInt32 => u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as f64,
        }
    }
}

#[derive(Debug)]
struct PlyProperty {
    name: String,
    data_type: PlyDataType,
}

struct PlyHeader {
    vertex_count: usize,
    properties: Vec<PlyProperty>,
}

fn parse_data_type(type_str: &str) -> Result<PlyDataType, GeomError> {
    match type_str {
        "float" | "float32" => Ok(PlyDataType::Float32),
        "double" | "float64" => Ok(PlyDataType::Float64),
        "char" | "int8" => Ok(PlyDataType::Int8),
        "uchar" | "uint8" => Ok(PlyDataType::UInt8),
        "short" | "int16" => Ok(PlyDataType::Int16),
        "ushort" | "uint16" => Ok(PlyDataType::UInt16),
        "int" | "int32" => Ok(PlyDataType::Int32),
        "uint" | "uint32" => Ok(PlyDataType::UInt32),
        other => Err(GeomError::UnsupportedPly(format!(
            "unknown property type `{other}`"
        ))),
    }
}

fn parse_header<R: BufRead>(reader: &mut R) -> Result<PlyHeader, GeomError> {
    let mut line = String::new();
    let mut vertex_count = None;
    let mut is_binary_little_endian = false;
    let mut is_ply = false;
    let mut properties = Vec::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim();

        if trimmed == "ply" {
            is_ply = true;
            continue;
        }
        if trimmed == "end_header" {
            break;
        }
        if trimmed.starts_with("format binary_little_endian") {
            is_binary_little_endian = true;
        } else if trimmed.starts_with("element vertex") {
            vertex_count = trimmed
                .split_whitespace()
                .last()
                .and_then(|s| s.parse().ok());
        } else if trimmed.starts_with("property") {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() >= 3 {
                if parts[1] == "list" {
                    return Err(GeomError::UnsupportedPly(
                        "list properties are not supported".into(),
                    ));
                }
                properties.push(PlyProperty {
                    name: parts[2].to_string(),
                    data_type: parse_data_type(parts[1])?,
                });
            }
        }
    }

    if !is_ply {
        return Err(GeomError::UnsupportedPly("missing `ply` magic".into()));
    }
    if !is_binary_little_endian {
        return Err(GeomError::UnsupportedPly(
            "only binary little endian files are supported".into(),
        ));
    }
    let vertex_count =
        vertex_count.ok_or_else(|| GeomError::UnsupportedPly("missing vertex element".into()))?;

    Ok(PlyHeader {
        vertex_count,
        properties,
    })
}

/// Read the vertex positions of a binary little-endian PLY file.
///
/// Properties other than `x`, `y` and `z` are skipped. When `nx`, `ny`, `nz`
/// properties are present the normals are read as well.
pub fn read_ply_binary(path: impl AsRef<Path>) -> Result<PointCloud, GeomError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(GeomError::FileDoesNotExist(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    let header = parse_header(&mut reader)?;

    // byte offset of every property within one vertex record
    let mut offsets = Vec::with_capacity(header.properties.len());
    let mut record_size = 0usize;
    for prop in &header.properties {
        offsets.push(record_size);
        record_size += prop.data_type.size_of();
    }

    let find = |name: &str| {
        header
            .properties
            .iter()
            .position(|p| p.name == name)
            .map(|i| (offsets[i], header.properties[i].data_type))
    };
    let (x, y, z) = match (find("x"), find("y"), find("z")) {
        (Some(x), Some(y), Some(z)) => (x, y, z),
        _ => {
            return Err(GeomError::UnsupportedPly(
                "missing x/y/z vertex properties".into(),
            ))
        }
    };
    let normal_fields = match (find("nx"), find("ny"), find("nz")) {
        (Some(nx), Some(ny), Some(nz)) => Some((nx, ny, nz)),
        _ => None,
    };

    let mut buffer = vec![0u8; record_size];
    let mut points = Vec::with_capacity(header.vertex_count);
    let mut normals = normal_fields.map(|_| Vec::with_capacity(header.vertex_count));

    let field = |buf: &[u8], (off, ty): (usize, PlyDataType)| ty.read_as_f64(&buf[off..]);

    for _ in 0..header.vertex_count {
        reader.read_exact(&mut buffer)?;
        points.push([
            field(&buffer, x),
            field(&buffer, y),
            field(&buffer, z),
        ]);
        if let (Some(normals), Some((nx, ny, nz))) = (normals.as_mut(), normal_fields) {
            normals.push([
                field(&buffer, nx),
                field(&buffer, ny),
                field(&buffer, nz),
            ]);
        }
    }

    log::trace!("read {} points from {}", points.len(), path.display());

    Ok(PointCloud::new(points, normals))
}

/// Write vertex positions as a float32 binary little-endian PLY file.
pub fn write_ply_binary(path: impl AsRef<Path>, points: &[[f64; 3]]) -> Result<(), GeomError> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    writeln!(writer, "ply")?;
    writeln!(writer, "format binary_little_endian 1.0")?;
    writeln!(writer, "element vertex {}", points.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "end_header")?;
    for p in points {
        for v in p {
            writer.write_all(&(*v as f32).to_le_bytes())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_positions() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("0.ply");
        let points = vec![[0.0, 1.0, 2.0], [3.0, -4.0, 5.5]];
        write_ply_binary(&path, &points)?;

        let cloud = read_ply_binary(&path)?;
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.points()[1], [3.0, -4.0, 5.5]);
        assert!(cloud.normals().is_none());
        Ok(())
    }

    #[test]
    fn ascii_ply_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("ascii.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 0\nend_header\n",
        )?;
        assert!(matches!(
            read_ply_binary(&path),
            Err(GeomError::UnsupportedPly(_))
        ));
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            read_ply_binary("/nonexistent/frame.ply"),
            Err(GeomError::FileDoesNotExist(_))
        ));
    }
}
