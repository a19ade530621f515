//! Fixed content for the starter world every new identity receives.

use chrono::{DateTime, Utc};

use loreforge_domain::{
    Character, CharacterDraft, ChildEntity, Faction, FactionDraft, Location, LocationDraft, Magic,
    MagicDraft, StoryEvent, StoryEventDraft, UserId, World, WorldSeed,
};

/// Name of the seeded starter world.
pub const DEMO_WORLD_NAME: &str = "Mythworld (Demo)";

const DEMO_WORLD_SUMMARY: &str = "A high-fantasy realm where ancient magic collides with \
     political intrigue, floating islands drift through endless skies, and forgotten ruins hold \
     the secrets of a fallen civilization.";

/// Build the full demo aggregate for a new user.
pub fn demo_seed(user_id: UserId, now: DateTime<Utc>) -> WorldSeed {
    let world = World::new(user_id, DEMO_WORLD_NAME, DEMO_WORLD_SUMMARY, now);
    let world_id = world.id;

    let characters = demo_characters()
        .into_iter()
        .map(|draft| Character::new(world_id, draft, now))
        .collect();
    let locations = demo_locations()
        .into_iter()
        .map(|draft| Location::new(world_id, draft, now))
        .collect();
    let magics = demo_magics()
        .into_iter()
        .map(|draft| Magic::new(world_id, draft, now))
        .collect();
    let factions = demo_factions()
        .into_iter()
        .map(|draft| Faction::new(world_id, draft, now))
        .collect();
    let events = demo_events()
        .into_iter()
        .map(|draft| StoryEvent::new(world_id, draft, now))
        .collect();

    WorldSeed {
        world,
        characters,
        locations,
        magics,
        factions,
        events,
    }
}

fn demo_characters() -> Vec<CharacterDraft> {
    vec![
        CharacterDraft {
            name: "Elara Vane".into(),
            role: "Runecrafter & Scholar".into(),
            age: "32".into(),
            description: "A brilliant runecrafter with silver-streaked auburn hair and \
                 ink-stained fingers, known for deciphering lost magical texts."
                .into(),
            personality: "Curious, methodical, fiercely independent".into(),
            backstory: "Orphaned during the Night of Falling Stars, raised by the Silver \
                 Covenant's archivists."
                .into(),
            strengths: "Ancient language expertise, rune magic, problem-solving".into(),
            weaknesses: "Reckless when pursuing knowledge, distrusts authority".into(),
        },
        CharacterDraft {
            name: "Kaelen Gorok".into(),
            role: "Exiled Warlord".into(),
            age: "45".into(),
            description: "A towering orc with ritual scars and a notched greatsword, seeking \
                 redemption for past atrocities."
                .into(),
            personality: "Stoic, honorable, haunted by guilt".into(),
            backstory: "Former commander of the Ashen Horde, turned against his own people to \
                 stop a genocide."
                .into(),
            strengths: "Combat mastery, tactical genius, intimidation".into(),
            weaknesses: "Carries psychological trauma, struggles with trust".into(),
        },
        CharacterDraft {
            name: "Zephyr".into(),
            role: "Sky-Pirate Captain".into(),
            age: "Unknown".into(),
            description: "A charismatic airship captain with wind-magic tattoos and a \
                 mysterious past."
                .into(),
            personality: "Charming, opportunistic, secretly idealistic".into(),
            backstory: "Found as a child in the Shattered Isles wreckage, raised by pirates, \
                 now seeks freedom for all."
                .into(),
            strengths: "Wind magic, aerial combat, negotiation".into(),
            weaknesses: "Commitment issues, gambling addiction, fear of abandonment".into(),
        },
    ]
}

fn demo_locations() -> Vec<LocationDraft> {
    vec![
        LocationDraft {
            name: "Highmere".into(),
            r#type: "Capital City".into(),
            population: "~200,000".into(),
            climate: "Temperate, coastal winds".into(),
            description: "The floating capital of the Silver Covenant, built on a massive \
                 island suspended by ancient Leybinding anchors. Crystal spires pierce the \
                 clouds, and skyships dock at gravity-defying ports."
                .into(),
            history: "Founded 800 years ago after the Sundering, Highmere became the center of \
                 magical academia and political power. Its levitation runes are powered by the \
                 imprisoned elemental spirits beneath the city."
                .into(),
        },
        LocationDraft {
            name: "The Shattered Isles".into(),
            r#type: "Archipelago Ruins".into(),
            population: "~5,000 (scattered settlements)".into(),
            climate: "Stormy, unpredictable".into(),
            description: "A maze of broken landmasses and debris fields left from the Night of \
                 Falling Stars. Treasure hunters, outcasts, and pirates call this lawless \
                 frontier home."
                .into(),
            history: "Once a thriving chain of sky-cities, the Isles were obliterated when an \
                 experimental Soulforging ritual backfired 200 years ago. Survivors claim the \
                 ruins are haunted by the souls of the dead."
                .into(),
        },
        LocationDraft {
            name: "Ebonreach Fortress".into(),
            r#type: "Military Stronghold".into(),
            population: "~8,000 (garrison)".into(),
            climate: "Cold, mountainous".into(),
            description: "A massive obsidian fortress carved into a mountain peak, home to the \
                 Breakers' revolutionary army. Its black walls absorb magic, making it nearly \
                 impervious to magical assault."
                .into(),
            history: "Built 50 years ago by enslaved workers, Ebonreach was seized by the \
                 Breakers during the uprising. Now it stands as a symbol of resistance against \
                 the Silver Covenant's rule."
                .into(),
        },
    ]
}

fn demo_magics() -> Vec<MagicDraft> {
    vec![
        MagicDraft {
            name: "Leybinding".into(),
            category: "Elemental Magic".into(),
            description: "The art of channeling raw elemental energy through ley lines, \
                 ancient rivers of magic that flow beneath the world. Practitioners can \
                 manipulate earth, fire, water, air, and lightning."
                .into(),
            rules: "Requires physical contact with a ley node or conductive material (crystal, \
                 metal, water). Power scales with proximity to ley lines."
                .into(),
            limitations: "Overuse causes 'ley sickness' (fever, hallucinations, magical \
                 burnout). Ley lines can be depleted or corrupted."
                .into(),
            costs: "Physical exhaustion, risk of elemental backlash if control is lost.".into(),
            examples: "Levitating cities with earth-binding, summoning storms with \
                 air-binding, creating volcanic eruptions with fire-binding."
                .into(),
        },
        MagicDraft {
            name: "Soulforging".into(),
            category: "Soul Magic (Forbidden)".into(),
            description: "The dangerous practice of binding souls, either one's own or \
                 another's, into objects, constructs, or even living bodies. Grants immense \
                 power but at horrific ethical and magical cost."
                .into(),
            rules: "Requires a living sacrifice (voluntary or not) and a vessel. The soul \
                 retains fragmented memories and personality."
                .into(),
            limitations: "Illegal under Silver Covenant law. Prolonged use erodes the caster's \
                 humanity. Soulforged constructs can go rogue."
                .into(),
            costs: "Moral corruption, risk of soul fragmentation, societal exile.".into(),
            examples: "Creating sentient weapons, transferring consciousness into golems, \
                 resurrecting the dead as hollow puppets."
                .into(),
        },
    ]
}

fn demo_factions() -> Vec<FactionDraft> {
    vec![
        FactionDraft {
            name: "The Silver Covenant".into(),
            r#type: "Ruling Oligarchy".into(),
            leader: "High Arcanist Seraphine Vael".into(),
            description: "The dominant political and magical authority in Mythworld, ruling \
                 from Highmere. Comprised of noble houses, archmages, and merchant guilds."
                .into(),
            goals: "Maintain magical supremacy, preserve the status quo, expand trade \
                 networks."
                .into(),
            conflicts: "Faces rebellion from the Breakers, ethical scrutiny over Soulforging \
                 ban enforcement, internal power struggles."
                .into(),
        },
        FactionDraft {
            name: "The Ashen Circle".into(),
            r#type: "Secret Society".into(),
            leader: "Unknown (rumored to be 'The Ember')".into(),
            description: "A shadowy cabal of rogue mages obsessed with uncovering \
                 pre-Sundering magical knowledge. Operates in the Shattered Isles and \
                 underground networks."
                .into(),
            goals: "Rediscover lost Soulforging techniques, challenge the Covenant's magical \
                 monopoly."
                .into(),
            conflicts: "Hunted by Covenant inquisitors, internal disagreements over ethics, \
                 competition with pirates for ruin access."
                .into(),
        },
        FactionDraft {
            name: "The Breakers".into(),
            r#type: "Revolutionary Army".into(),
            leader: "General Thorne Ironfist".into(),
            description: "A militant faction of former slaves, laborers, and disenfranchised \
                 citizens seeking to overthrow the Silver Covenant. Based in Ebonreach \
                 Fortress."
                .into(),
            goals: "Abolish magical slavery, redistribute wealth, establish democratic rule."
                .into(),
            conflicts: "Outmatched militarily by the Covenant, accused of terrorism, struggles \
                 with internal radicalization."
                .into(),
        },
    ]
}

fn demo_events() -> Vec<StoryEventDraft> {
    vec![
        StoryEventDraft {
            title: "The Night of Falling Stars".into(),
            date: "200 years ago".into(),
            description: "A catastrophic magical disaster where dozens of floating islands \
                 lost their levitation magic and plummeted from the sky, killing hundreds of \
                 thousands."
                .into(),
            location: "The Shattered Isles (formerly known as the Starlight Archipelago)"
                .into(),
            characters_involved: "Unknown (predates current characters)".into(),
            outcome: "Created the Shattered Isles, led to the ban on experimental Soulforging, \
                 and sparked the rise of the Silver Covenant's strict magical regulation."
                .into(),
        },
        StoryEventDraft {
            title: "The Highmere Accord".into(),
            date: "50 years ago".into(),
            description: "A peace treaty signed between the Silver Covenant and the \
                 newly-formed Breakers after a brutal 5-year civil war."
                .into(),
            location: "Highmere, Hall of Echoes".into(),
            characters_involved: "High Arcanist Seraphine Vael, General Thorne Ironfist \
                 (represented Breakers)"
                .into(),
            outcome: "Temporary ceasefire established, but tensions remain high. Breakers \
                 gained autonomy over Ebonreach Fortress."
                .into(),
        },
        StoryEventDraft {
            title: "The Ebonreach Breach".into(),
            date: "3 months ago".into(),
            description: "A mysterious explosion ripped through Ebonreach Fortress's western \
                 wall, killing 300 soldiers. Both sides accuse each other of sabotage."
                .into(),
            location: "Ebonreach Fortress".into(),
            characters_involved: "Kaelen Gorok (investigating), Elara Vane (hired to analyze \
                 magical residue)"
                .into(),
            outcome: "Investigation ongoing. Evidence suggests neither side was responsible, \
                 possibly the work of the Ashen Circle."
                .into(),
        },
    ]
}
