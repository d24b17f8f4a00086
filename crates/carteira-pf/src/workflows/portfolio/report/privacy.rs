/// Masks a client name for presentation: "Maria da Silva" -> "Maria S.".
pub fn mask_name(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [] => String::new(),
        [first] => format!("{first} ."),
        [first, .., last] => {
            let initial: String = last.chars().take(1).collect();
            format!("{first} {initial}.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_name_and_last_initial() {
        assert_eq!(mask_name("Maria da Silva"), "Maria S.");
        assert_eq!(mask_name("  João   Álvares "), "João Á.");
    }

    #[test]
    fn single_and_blank_names() {
        assert_eq!(mask_name("Cher"), "Cher .");
        assert_eq!(mask_name("   "), "");
    }
}
