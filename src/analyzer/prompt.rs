/// Fixed instructions sent with every request

pub const VEHICLE_PROMPT: &str = "What is this car's or truck's make, model, estimate of year, and \
registration number? If there is no registration, reply with 'No registration can be seen'. \
If only part of a car can be seen, don't try to make out what it is. \
Please use the format 'Car -' position of car in image, 'Make -' make of car, \
'Model -' model of car, 'Year -' year of car, 'Registration -' registration of car. \
Separate multiple cars with a ':'";

pub const DAMAGE_PROMPT: &str = "Then assess any visible damage for each car. \
Use the format 'Damage -' followed by the damaged area and a severity of minor, moderate or severe. \
If no damage can be seen, reply with 'Damage - None visible'.";

/// The single prompt string for one request
pub fn build(damage_assessment: bool) -> String {
    if damage_assessment {
        format!("{}\n\n{}", VEHICLE_PROMPT, DAMAGE_PROMPT)
    } else {
        VEHICLE_PROMPT.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_instruction_is_appended() {
        let prompt = build(true);
        assert!(prompt.starts_with(VEHICLE_PROMPT));
        assert!(prompt.ends_with(DAMAGE_PROMPT));
    }

    #[test]
    fn test_vehicle_only() {
        assert_eq!(build(false), VEHICLE_PROMPT);
    }
}
