/// Newline-separated character chunking: pieces are packed greedily up to
/// `chunk_size`, and each new chunk starts with up to `overlap` characters of
/// tail pieces from the previous one. A single piece longer than `chunk_size`
/// is kept whole rather than split mid-line.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for piece in text.split('\n') {
        let piece = piece.trim_end();
        if piece.trim().is_empty() {
            continue;
        }
        let piece_len = piece.len() + 1;

        if current_len + piece_len > chunk_size && !current.is_empty() {
            chunks.push(current.join("\n"));

            // Carry a tail of the previous chunk forward for continuity.
            let mut tail: Vec<&str> = Vec::new();
            let mut tail_len = 0;
            for kept in current.iter().rev() {
                if tail_len + kept.len() + 1 > overlap {
                    break;
                }
                tail_len += kept.len() + 1;
                tail.insert(0, kept);
            }
            current = tail;
            current_len = tail_len;
        }

        current_len += piece_len;
        current.push(piece);
    }

    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }
    chunks
}
