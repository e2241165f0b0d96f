use crate::tile::{
    catalog::ReferenceCode,
    grid::{TileCell, TileGrid, TileGridError, TileGridResult},
};


// ----------------------------------------------
// Binary grid format
// ----------------------------------------------
//
// Little-endian, no padding:
//   [0..4]  num_rows (i32)
//   [4..8]  num_cols (i32)
//   [8..]   num_rows * num_cols records, row-major:
//             reference_code (i16)
//             elevation      (u8)

pub const HEADER_SIZE: usize = 8;
pub const RECORD_SIZE: usize = 3;

pub const FILE_EXTENSION: &str = "grid";

pub fn encode_grid(grid: &TileGrid) -> Vec<u8> {
    let cells = grid.cells();
    let mut out = Vec::with_capacity(HEADER_SIZE + cells.len() * RECORD_SIZE);

    out.extend_from_slice(&grid.num_rows().to_le_bytes());
    out.extend_from_slice(&grid.num_cols().to_le_bytes());

    for cell in cells {
        out.extend_from_slice(&cell.reference_code.to_le_bytes());
        out.push(cell.elevation);
    }

    out
}

// Fails with MalformedData if the header is truncated or the body length
// does not match the header dimensions.
pub fn decode_grid(bytes: &[u8]) -> TileGridResult<TileGrid> {
    if bytes.len() < HEADER_SIZE {
        return Err(TileGridError::MalformedData { expected: HEADER_SIZE, actual: bytes.len() });
    }

    let num_rows = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let num_cols = i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

    // Validate dimensions before trusting them for any size math.
    let size = TileGrid::validate_dimensions(num_rows, num_cols)?;

    let body = &bytes[HEADER_SIZE..];
    let expected = size.cell_count() * RECORD_SIZE;
    if body.len() != expected {
        return Err(TileGridError::MalformedData { expected, actual: body.len() });
    }

    let cells = body
        .chunks_exact(RECORD_SIZE)
        .map(|record| TileCell::new(ReferenceCode::from_le_bytes([record[0], record[1]]), record[2]))
        .collect();

    TileGrid::load(cells, num_rows, num_cols)
}
