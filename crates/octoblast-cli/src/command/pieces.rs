use octoblast_engine::canonical_pieces;

pub(crate) fn run() -> anyhow::Result<()> {
    let pieces = canonical_pieces();
    println!("{} canonical pieces", pieces.len());
    for (index, piece) in pieces.iter().enumerate() {
        println!();
        println!(
            "#{index} ({}x{}, {} cells)",
            piece.height(),
            piece.width(),
            piece.cell_count()
        );
        println!("{piece}");
    }
    Ok(())
}
