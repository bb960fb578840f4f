fn main() {
    contact_damage::game::run();
}
