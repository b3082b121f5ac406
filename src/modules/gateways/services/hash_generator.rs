/// Lower-case hex MD5 digest of `input`
fn md5_hex(input: &str) -> String {
    hex::encode(md5::compute(input.as_bytes()).0)
}

/// Transaction hash required by the gateway on `processCard`.
///
/// `md5(lower(md5(passphrase) + merchant_id + amount + currency))`, all
/// digests lower-case hex. `amount` must already be formatted to two
/// decimal places, exactly as it is sent in `transactionAmount`.
pub fn compute_hash(passphrase: &str, merchant_id: &str, amount: &str, currency: &str) -> String {
    let passphrase_digest = md5_hex(passphrase);

    let concatenated = format!("{}{}{}{}", passphrase_digest, merchant_id, amount, currency);

    md5_hex(&concatenated.to_lowercase())
}
