use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use crate::matrix::SparseMatrix;
use crate::error::IoError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Layout {
    Coordinate,
    Array
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Real,
    Integer,
    Pattern
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Symmetry {
    General,
    Symmetric,
    SkewSymmetric
}

/// Parsed `%%MatrixMarket matrix <layout> <field> <symmetry>` banner.
#[derive(Debug, Clone, Copy)]
struct Header {
    layout : Layout,
    field : Field,
    symmetry : Symmetry
}

impl FromStr for Header {

    type Err = IoError;

    fn from_str(line : &str) -> Result<Self, IoError> {
        let tokens : Vec<String> = line.split_whitespace().map(|t| t.to_lowercase() ).collect();
        if tokens.len() != 5 || tokens[0] != "%%matrixmarket" {
            return Err(IoError::parse(1, "Missing %%MatrixMarket banner"));
        }
        if tokens[1] != "matrix" {
            return Err(IoError::Unsupported(format!("object '{}'", tokens[1])));
        }
        let layout = match &tokens[2][..] {
            "coordinate" => Layout::Coordinate,
            "array" => Layout::Array,
            other => return Err(IoError::Unsupported(format!("format '{}'", other)))
        };
        let field = match &tokens[3][..] {
            "real" | "double" => Field::Real,
            "integer" => Field::Integer,
            "pattern" if layout == Layout::Coordinate => Field::Pattern,
            other => return Err(IoError::Unsupported(format!("field '{}'", other)))
        };
        let symmetry = match &tokens[4][..] {
            "general" => Symmetry::General,
            "symmetric" => Symmetry::Symmetric,
            "skew-symmetric" => Symmetry::SkewSymmetric,
            other => return Err(IoError::Unsupported(format!("symmetry '{}'", other)))
        };
        Ok(Header { layout, field, symmetry })
    }

}

fn parse_token<T : FromStr>(tok : Option<&str>, line : usize, what : &str) -> Result<T, IoError> {
    let tok = tok.ok_or_else(|| IoError::parse(line, format!("Missing {}", what)) )?;
    tok.parse::<T>().map_err(|_| IoError::parse(line, format!("Invalid {} '{}'", what, tok)) )
}

/// Cells an array-layout file stores, in file (column-major) order. Symmetric
/// storage keeps the lower triangle with its diagonal, skew-symmetric storage
/// the strict lower triangle.
fn array_cells(nrows : usize, ncols : usize, symmetry : Symmetry) -> Vec<(usize, usize)> {
    (0..ncols)
        .flat_map(|j| (0..nrows).map(move |i| (i, j) ) )
        .filter(|&(i, j)| match symmetry {
            Symmetry::General => true,
            Symmetry::Symmetric => i >= j,
            Symmetry::SkewSymmetric => i > j
        })
        .collect()
}

/// Reads a matrix in Matrix Market exchange format (coordinate or array
/// layout; real, integer or pattern fields; general, symmetric or
/// skew-symmetric storage). Indices in the file are 1-based.
pub fn read_matrix<R : Read>(reader : R) -> Result<SparseMatrix, IoError> {
    let mut lines = BufReader::new(reader).lines().enumerate();
    let header : Header = match lines.next() {
        Some((_, line)) => line?.parse()?,
        None => return Err(IoError::parse(1, "Empty input"))
    };

    let mut size : Option<(usize, usize, usize)> = None;
    let mut triplets = Vec::new();
    let mut cells = Vec::new();
    let mut read = 0;
    for (ix, line) in lines {
        let line = line?;
        let lineno = ix + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        let mut toks = trimmed.split_whitespace();
        let (nrows, ncols, declared) = match size {
            None => {
                let nrows : usize = parse_token(toks.next(), lineno, "row count")?;
                let ncols : usize = parse_token(toks.next(), lineno, "column count")?;
                if header.symmetry != Symmetry::General && nrows != ncols {
                    return Err(IoError::parse(lineno, format!("Symmetric storage of a {}x{} matrix", nrows, ncols)));
                }
                let nnz = match header.layout {
                    Layout::Coordinate => parse_token(toks.next(), lineno, "entry count")?,
                    Layout::Array => {
                        cells = array_cells(nrows, ncols, header.symmetry);
                        cells.len()
                    }
                };
                size = Some((nrows, ncols, nnz));
                continue;
            },
            Some(sz) => sz
        };
        let (r, c, v) = match header.layout {
            Layout::Coordinate => {
                let r : usize = parse_token(toks.next(), lineno, "row index")?;
                let c : usize = parse_token(toks.next(), lineno, "column index")?;
                let v = match header.field {
                    Field::Pattern => 1.0,
                    _ => parse_token(toks.next(), lineno, "value")?
                };
                if r == 0 || c == 0 || r > nrows || c > ncols {
                    return Err(IoError::parse(lineno, format!("Index ({}, {}) outside {}x{}", r, c, nrows, ncols)));
                }
                (r - 1, c - 1, v)
            },
            Layout::Array => {
                let v : f64 = parse_token(toks.next(), lineno, "value")?;
                match cells.get(read) {
                    Some(&(r, c)) => (r, c, v),
                    None => return Err(IoError::parse(lineno, "More entries than declared"))
                }
            }
        };
        read += 1;
        if read > declared {
            return Err(IoError::parse(lineno, "More entries than declared"));
        }
        triplets.push((r, c, v));
        match header.symmetry {
            Symmetry::Symmetric if r != c => triplets.push((c, r, v)),
            Symmetry::SkewSymmetric if r != c => triplets.push((c, r, -v)),
            _ => { }
        }
    }
    let (nrows, ncols, _) = size.ok_or_else(|| IoError::parse(1, "Missing size line") )?;
    log::debug!("Read {}x{} matrix with {} entries", nrows, ncols, triplets.len());
    Ok(SparseMatrix::from_triplets(nrows, ncols, triplets)?)
}

/// Writes the matrix as `coordinate real general`, one 1-based entry per line.
/// Values use Rust's shortest round-trip float formatting.
pub fn write_matrix<W : Write>(matrix : &SparseMatrix, writer : W) -> Result<(), IoError> {
    let mut w = BufWriter::new(writer);
    writeln!(w, "%%MatrixMarket matrix coordinate real general")?;
    writeln!(w, "%")?;
    writeln!(w, "{} {} {}", matrix.nrows(), matrix.ncols(), matrix.nnz())?;
    for (r, c, v) in matrix.iter() {
        writeln!(w, "{} {} {}", r + 1, c + 1, v)?;
    }
    w.flush()?;
    Ok(())
}

pub fn load_matrix<P : AsRef<Path>>(path : P) -> Result<SparseMatrix, IoError> {
    let path = path.as_ref();
    log::debug!("Loading matrix from {}", path.display());
    read_matrix(File::open(path)?)
}

pub fn save_to_path<P : AsRef<Path>>(matrix : &SparseMatrix, path : P) -> Result<(), IoError> {
    let path = path.as_ref();
    log::debug!("Saving {}x{} matrix to {}", matrix.nrows(), matrix.ncols(), path.display());
    write_matrix(matrix, File::create(path)?)
}

/// Saves the matrix as folder/file_name, creating the folder when needed.
/// Returns the full path written.
pub fn save_matrix<P : AsRef<Path>>(matrix : &SparseMatrix, file_name : &str, folder : P) -> Result<PathBuf, IoError> {
    let folder = folder.as_ref();
    if !folder.as_os_str().is_empty() {
        fs::create_dir_all(folder)?;
    }
    let path = folder.join(file_name);
    save_to_path(matrix, &path)?;
    Ok(path)
}
