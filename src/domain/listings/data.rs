use super::Listing;
use time::macros::date;

pub static LISTINGS: [Listing; 8] = [
    Listing {
        id: "1",
        title: "Two-Bed Apartment in the Northern Quarter",
        description: "A bright second-floor apartment above the independent coffee shops of the Northern Quarter. Open-plan living space, exposed brickwork, and secure fob entry. Piccadilly station is an eight-minute walk.",
        address: "14 Tariff Street",
        city: "Manchester",
        bedrooms: 2,
        bathrooms: 1,
        price: 1100,
        features: &["Furnished", "City centre", "Exposed brick", "Secure entry"],
        available_from: date!(2026 - 09 - 01),
        image_url: "/static/images/listings/1.jpg",
    },
    Listing {
        id: "2",
        title: "One-Bed Flat by the Leeds Dock",
        description: "A modern one-bedroom flat in a waterside development at Leeds Dock. Floor-to-ceiling windows over the Aire, residents' gym, and the water taxi into town on the doorstep.",
        address: "3 Armouries Way",
        city: "Leeds",
        bedrooms: 1,
        bathrooms: 1,
        price: 795,
        features: &["Waterside", "Residents' gym", "Balcony"],
        available_from: date!(2026 - 08 - 15),
        image_url: "/static/images/listings/2.jpg",
    },
    Listing {
        id: "3",
        title: "Studio on the Baltic Triangle",
        description: "A compact studio in a converted warehouse on the edge of the Baltic Triangle. Mezzanine sleeping deck, bills included, and some of the best venues in Liverpool within five minutes on foot.",
        address: "58 Jamaica Street",
        city: "Liverpool",
        bedrooms: 0,
        bathrooms: 1,
        price: 650,
        features: &["Bills included", "Warehouse conversion", "Mezzanine"],
        available_from: date!(2026 - 10 - 01),
        image_url: "/static/images/listings/3.jpg",
    },
    Listing {
        id: "4",
        title: "One-Bed Apartment in Castlefield",
        description: "A quiet one-bedroom apartment beside the Castlefield canal basin. Private parking space, juliet balcony over the towpath, and Deansgate a short stroll away.",
        address: "22 Slate Wharf",
        city: "Manchester",
        bedrooms: 1,
        bathrooms: 1,
        price: 850,
        features: &["Parking", "Canal views", "Juliet balcony"],
        available_from: date!(2026 - 09 - 15),
        image_url: "/static/images/listings/4.jpg",
    },
    Listing {
        id: "5",
        title: "Three-Bed Townhouse in Didsbury",
        description: "A family townhouse on a tree-lined street in West Didsbury. Landscaped rear garden, two bathrooms, and excellent schools and tram links close by.",
        address: "7 Palatine Road",
        city: "Manchester",
        bedrooms: 3,
        bathrooms: 2,
        price: 1450,
        features: &["Garden", "Unfurnished", "Pet friendly", "Near tram"],
        available_from: date!(2026 - 11 - 01),
        image_url: "/static/images/listings/5.jpg",
    },
    Listing {
        id: "6",
        title: "Two-Bed Flat in Kelham Island",
        description: "A two-bedroom flat in a former cutlery works in Kelham Island. Double-height ceilings, allocated parking, and Sheffield city centre within walking distance.",
        address: "31 Green Lane",
        city: "Sheffield",
        bedrooms: 2,
        bathrooms: 1,
        price: 900,
        features: &["Parking", "High ceilings", "Furnished"],
        available_from: date!(2026 - 08 - 20),
        image_url: "/static/images/listings/6.jpg",
    },
    Listing {
        id: "7",
        title: "Studio inside the City Walls",
        description: "A characterful studio tucked into a courtyard inside the York city walls. Beamed ceiling, small kitchenette, and the Minster visible from the doorstep.",
        address: "5 Goodramgate",
        city: "York",
        bedrooms: 0,
        bathrooms: 1,
        price: 550,
        features: &["Period features", "Courtyard", "Bills included"],
        available_from: date!(2026 - 09 - 10),
        image_url: "/static/images/listings/7.jpg",
    },
    Listing {
        id: "8",
        title: "Four-Bed House in Chapel Allerton",
        description: "A spacious Victorian terrace in Chapel Allerton with four double bedrooms. Cellar storage, south-facing garden, and the local high street two minutes away.",
        address: "19 Harrogate Road",
        city: "Leeds",
        bedrooms: 4,
        bathrooms: 2,
        price: 1600,
        features: &["Garden", "Cellar", "Period features", "Unfurnished"],
        available_from: date!(2026 - 10 - 15),
        image_url: "/static/images/listings/8.jpg",
    },
];
