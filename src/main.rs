use std::io;

use spmatrix::io::{write_matrix_market, ValueFormat};
use spmatrix::{SparseFormat, SparseMatrix};

fn main() -> spmatrix::Result<()> {
    env_logger::init();

    println!("spmatrix {}: sparse matrix storage", spmatrix::VERSION);

    // A 5×4 matrix with an empty row
    let entries = [
        (0, 2, 3.1),
        (0, 3, 4.6),
        (1, 0, 1.0),
        (1, 2, 7.2),
        (3, 0, 2.1),
        (3, 1, 2.9),
        (3, 3, 8.5),
        (4, 0, 4.1),
    ];

    let mut a = SparseMatrix::new(5, 4)?;
    for &(i, j, v) in &entries {
        a.set(i, j, v)?;
    }

    println!("\nTriplet form:");
    println!("{:?}", a);

    let ccs = a.compress(SparseFormat::Ccs)?;
    println!("\nCompressed column form:");
    println!("{:?}", ccs);

    let crs = a.compress(SparseFormat::Crs)?;
    println!("\nCompressed row form:");
    println!("{:?}", crs);

    let (min, max) = crs.minmax()?;
    println!("\nStored values range over [{}, {}]", min, max);

    let mut t = ccs.clone();
    t.transpose_duality()?;
    println!("\nTranspose by duality ({} {}×{}):", t.format(), t.n_rows(), t.n_cols());
    println!("{:?}", t);

    let doubled = crs.add(&crs)?;
    println!("\nA + A in Matrix Market form:");
    write_matrix_market(&doubled, &mut io::stdout().lock(), ValueFormat::Fixed(2))?;

    Ok(())
}
