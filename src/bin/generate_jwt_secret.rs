use base64::Engine;
use rand::RngCore;

fn main() {
    println!("🔐 Support chat JWT secret generator");
    println!("====================================");

    // 256-bit key from the OS-seeded CSPRNG
    let mut key = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut key);

    let base64_key = base64::engine::general_purpose::STANDARD.encode(key);
    let hex_key = hex::encode(key);

    println!();
    println!("Base64: {}", base64_key);
    println!("Hex:    {}", hex_key);
    println!();
    println!("📝 Add this line to your .env file:");
    println!("JWT_SECRET={}", base64_key);
}
