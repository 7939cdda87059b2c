fn main() {
    cookieport::cli::run();
}
