/// Remove every occurrence of each listed substring from raw OCR text.
///
/// Exact matching only. Removals run in list order and each one scans the
/// text left behind by the previous ones, so overlapping entries resolve in
/// list order too.
pub fn filter_raw_text<S: AsRef<str>>(text: &str, sequences_to_remove: &[S]) -> String {
    let mut cleaned = text.to_string();
    for seq in sequences_to_remove {
        let seq = seq.as_ref();
        if seq.is_empty() {
            continue;
        }
        cleaned = cleaned.replace(seq, "");
    }
    cleaned
}
