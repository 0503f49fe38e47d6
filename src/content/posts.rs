use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BlogPost {
    pub id: u32,
    pub author: &'static str,
    pub avatar: &'static str,
    pub title: &'static str,
    /// Paragraphs separated by a blank line.
    pub content: &'static str,
    pub tags: &'static [&'static str],
    pub date: &'static str,
}

impl BlogPost {
    pub fn paragraphs(&self) -> Vec<&'static str> {
        self.content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunityPost {
    pub id: u32,
    pub author: &'static str,
    pub avatar: &'static str,
    pub title: &'static str,
    pub content: &'static str,
    pub tags: &'static [&'static str],
    pub upvotes: u32,
    pub comments: u32,
}

pub static BLOG_POSTS: &[BlogPost] = &[
    BlogPost {
        id: 1,
        author: "Enzo F.",
        avatar: "https://picsum.photos/seed/enzo/40/40",
        title: "Aggressive 1-Stop Strategy for Monza",
        content: "With low tire degradation at Monza, an aggressive one-stop strategy starting on \
Softs and switching to Hards around lap 25 could be optimal.\n\n\
The catch is track position. A one-stopper only pays off with a strong qualifying result, because \
overtaking into the first chicane costs more time than the saved pit stop buys back.\n\n\
Watch the safety car window between laps 18 and 30: a neutralised race in that range turns the \
plan into a free stop.",
        tags: &["Strategy", "Tires"],
        date: "August 28, 2024",
    },
    BlogPost {
        id: 2,
        author: "Adrian N.",
        avatar: "https://picsum.photos/seed/adrian/40/40",
        title: "High Downforce Setup for Monaco",
        content: "Maximizing downforce is key for the tight corners of the principality. A steeper \
rear wing increases surface area without a meaningful drag penalty on the short straights.\n\n\
Mechanical grip matters as much as aero here. Softer springs and a higher ride height let the car \
ride the kerbs through the swimming pool section.",
        tags: &["Engineering", "Setups"],
        date: "May 21, 2024",
    },
    BlogPost {
        id: 3,
        author: "Hannah S.",
        avatar: "https://picsum.photos/seed/hannah/40/40",
        title: "Tire Management in Hot Conditions at Bahrain",
        content: "The key to Bahrain is managing rear tire temperatures. A differential setup that \
allows more rotation on corner entry helps, but it needs precise driver input to avoid snap \
oversteer.\n\n\
Abrasive tarmac and desert heat punish wheelspin. Short-shifting out of the slow hairpins keeps \
the surface temperature inside the working window.",
        tags: &["Tires", "Driving Style"],
        date: "March 4, 2024",
    },
    BlogPost {
        id: 4,
        author: "Marcus L.",
        avatar: "https://picsum.photos/seed/marcus/40/40",
        title: "Reading Ground Effect Floors",
        content: "Modern cars generate most of their load underneath. Venturi tunnels accelerate the \
air beneath the floor and the pressure drop pulls the car onto the track.\n\n\
Ride height is the whole game: run too low and the floor stalls, producing the porpoising \
bounce teams fought through the first seasons of the regulations.",
        tags: &["Aerodynamics", "Engineering"],
        date: "February 12, 2024",
    },
    BlogPost {
        id: 5,
        author: "Priya K.",
        avatar: "https://picsum.photos/seed/priya/40/40",
        title: "What Telemetry Says About Braking",
        content: "Brake pressure traces separate good laps from great ones. The best drivers hit peak \
pressure instantly and bleed it off smoothly as speed falls.\n\n\
Compare the release phase between team-mates: a longer trail into the apex usually means more \
rotation and a later throttle pick-up.",
        tags: &["Telemetry", "Driving Style"],
        date: "June 30, 2024",
    },
    BlogPost {
        id: 6,
        author: "Tom W.",
        avatar: "https://picsum.photos/seed/tom/40/40",
        title: "Undercut or Overcut at Silverstone",
        content: "Fast sweeping corners load the left-front tyre heavily, so fresh rubber is worth \
more here than at most venues.\n\n\
That usually favours the undercut, unless a warm track makes the new tyres slow to switch on. \
Then staying out for an overcut can win the position instead.",
        tags: &["Strategy", "Pit Stops"],
        date: "July 9, 2024",
    },
];

pub static COMMUNITY_POSTS: &[CommunityPost] = &[
    CommunityPost {
        id: 1,
        author: "Enzo F.",
        avatar: "https://picsum.photos/seed/enzo/40/40",
        title: "Aggressive 1-Stop Strategy for Monza",
        content: "With low tire degradation at Monza, an aggressive one-stop strategy starting on \
Softs and switching to Hards around lap 25 could be optimal. This requires a strong qualifying \
position to maintain track position.",
        tags: &["Strategy", "Monza"],
        upvotes: 128,
        comments: 14,
    },
    CommunityPost {
        id: 2,
        author: "Adrian N.",
        avatar: "https://picsum.photos/seed/adrian/40/40",
        title: "High Downforce Setup for Monaco",
        content: "Maximizing downforce is key for Monaco's tight corners. A new rear wing design I'm \
proposing increases surface area without significantly impacting drag on the short straights. \
See attached schematics.",
        tags: &["Engineering", "Setups"],
        upvotes: 256,
        comments: 32,
    },
    CommunityPost {
        id: 3,
        author: "Hannah S.",
        avatar: "https://picsum.photos/seed/hannah/40/40",
        title: "Tire Management in Hot Conditions at Bahrain",
        content: "The key to Bahrain is managing rear tire temperatures. A differential setup that \
allows for more rotation on corner entry can help, but it requires precise driver input to avoid \
snap oversteer.",
        tags: &["Tires", "Driving Style"],
        upvotes: 97,
        comments: 8,
    },
];

pub fn blog_post(id: u32) -> Option<&'static BlogPost> {
    BLOG_POSTS.iter().find(|post| post.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = BLOG_POSTS.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), BLOG_POSTS.len());
    }

    #[test]
    fn splits_content_into_paragraphs() {
        let post = blog_post(1).unwrap();
        let paragraphs = post.paragraphs();
        assert_eq!(paragraphs.len(), 3);
        assert!(paragraphs[0].starts_with("With low tire degradation"));
        assert!(paragraphs.iter().all(|p| !p.contains("\n\n")));
    }

    #[test]
    fn unknown_id_is_absent() {
        assert!(blog_post(999).is_none());
    }
}
